/// Word puzzle: place shuffled fragments into slots in phrase order.
///
/// Fragments live in an unordered pool; placing one fills the first
/// empty slot, scanning left to right. A filled slot can be emptied
/// back into the pool. When the last slot fills, the verdict is
/// deferred for a short suspense window and then re-reads the live
/// slots — if a fragment was pulled back out in the meantime, the check
/// simply lapses. A wrong order resets everything: slots emptied, pool
/// reshuffled, progress discarded.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::TimingConfig;
use crate::puzzle::completion::CompletionSignal;
use crate::puzzle::PuzzleEvent;
use crate::puzzle::tick_down;

/// The phrase, split on spaces into fragments.
pub const PHRASE: &str = "Every puzzle brings me closer to you";

/// One labeled fragment carrying its place in the phrase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Fragment {
    pub text: &'static str,
    pub order: usize,
}

/// Which area the cursor lives in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WordFocus {
    Pool,
    Slots,
}

pub struct WordPuzzle {
    /// Unplaced fragments, shuffled; order here is display order.
    pub pool: Vec<Fragment>,
    pub slots: Vec<Option<Fragment>>,
    pub focus: WordFocus,
    pub pool_cursor: usize,
    pub slot_cursor: usize,
    pub solved: bool,

    check_in: Option<u32>,
    check_delay: u32,
    signal: CompletionSignal,
    rng: StdRng,
}

impl WordPuzzle {
    pub fn new(timing: &TimingConfig, rng: &mut impl Rng, signal: CompletionSignal) -> Self {
        let mut own_rng = StdRng::from_rng(rng);
        let mut pool = fragments();
        pool.shuffle(&mut own_rng);
        let slot_count = pool.len();
        WordPuzzle {
            pool,
            slots: vec![None; slot_count],
            focus: WordFocus::Pool,
            pool_cursor: 0,
            slot_cursor: 0,
            solved: false,
            check_in: None,
            check_delay: timing.word_check,
            signal,
            rng: own_rng,
        }
    }

    pub fn switch_focus(&mut self, focus: WordFocus) {
        self.focus = focus;
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let (cursor, len) = match self.focus {
            WordFocus::Pool => (&mut self.pool_cursor, self.pool.len()),
            WordFocus::Slots => (&mut self.slot_cursor, self.slots.len()),
        };
        if len == 0 {
            return;
        }
        let next = *cursor as i32 + delta;
        if next >= 0 && (next as usize) < len {
            *cursor = next as usize;
        }
    }

    /// Act on the cursor: place the selected pool fragment into the
    /// first empty slot, or return the selected slot's fragment to the
    /// pool. Empty selections are silent no-ops.
    pub fn confirm(&mut self) -> Vec<PuzzleEvent> {
        if self.solved {
            return vec![];
        }
        match self.focus {
            WordFocus::Pool => self.place_selected(),
            WordFocus::Slots => self.return_selected(),
        }
    }

    fn place_selected(&mut self) -> Vec<PuzzleEvent> {
        if self.pool.is_empty() {
            return vec![];
        }
        let empty = match self.slots.iter().position(|s| s.is_none()) {
            Some(i) => i,
            None => return vec![],
        };

        let fragment = self.pool.remove(self.pool_cursor.min(self.pool.len() - 1));
        self.slots[empty] = Some(fragment);
        if self.pool_cursor >= self.pool.len() && self.pool_cursor > 0 {
            self.pool_cursor = self.pool.len() - 1;
        }

        if self.slots.iter().all(|s| s.is_some()) {
            self.check_in = Some(self.check_delay);
        }
        vec![PuzzleEvent::FragmentPlaced]
    }

    fn return_selected(&mut self) -> Vec<PuzzleEvent> {
        let Some(fragment) = self.slots[self.slot_cursor].take() else {
            return vec![];
        };
        self.pool.push(fragment);
        vec![PuzzleEvent::FragmentReturned]
    }

    pub fn tick(&mut self) -> Vec<PuzzleEvent> {
        if !tick_down(&mut self.check_in) {
            return vec![];
        }

        // The verdict reads the slots as they are NOW, not as they were
        // when the countdown started; a fragment returned during the
        // suspense window lapses the check entirely.
        if self.slots.iter().any(|s| s.is_none()) {
            return vec![];
        }

        let ordered = self
            .slots
            .iter()
            .enumerate()
            .all(|(i, s)| s.map(|f| f.order) == Some(i));

        if ordered {
            self.solved = true;
            self.signal.fire();
            return vec![PuzzleEvent::PuzzleSolved];
        }

        // Wrong order: discard all progress and reshuffle.
        self.pool = fragments();
        self.pool.shuffle(&mut self.rng);
        self.slots = vec![None; self.pool.len()];
        self.pool_cursor = 0;
        self.slot_cursor = 0;
        self.focus = WordFocus::Pool;
        vec![PuzzleEvent::OrderMismatch]
    }
}

fn fragments() -> Vec<Fragment> {
    PHRASE
        .split(' ')
        .enumerate()
        .map(|(order, text)| Fragment { text, order })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::completion::{self, CompletionWatcher};

    fn timing() -> TimingConfig {
        TimingConfig {
            tick_rate_ms: 50,
            solver_debounce: 2,
            solve_pause: 3,
            slide_solve_pause: 3,
            playback_step: 4,
            playback_flash: 2,
            round_pause: 2,
            mismatch_pause: 2,
            word_check: 2,
        }
    }

    fn mounted(seed: u64) -> (WordPuzzle, CompletionWatcher) {
        let (signal, watcher) = completion::channel();
        let mut rng = StdRng::seed_from_u64(seed);
        (WordPuzzle::new(&timing(), &mut rng, signal), watcher)
    }

    /// Place every fragment in correct phrase order.
    fn place_in_order(puzzle: &mut WordPuzzle) {
        for order in 0..puzzle.slots.len() {
            let at = puzzle
                .pool
                .iter()
                .position(|f| f.order == order)
                .expect("fragment still in pool");
            puzzle.pool_cursor = at;
            puzzle.focus = WordFocus::Pool;
            let events = puzzle.confirm();
            assert_eq!(events, vec![PuzzleEvent::FragmentPlaced]);
        }
    }

    #[test]
    fn phrase_splits_into_ordered_fragments() {
        let frags = fragments();
        assert_eq!(frags.len(), 7);
        assert_eq!(frags[0].text, "Every");
        assert_eq!(frags[6].text, "you");
        for (i, f) in frags.iter().enumerate() {
            assert_eq!(f.order, i);
        }
    }

    #[test]
    fn placement_fills_the_first_empty_slot() {
        let (mut puzzle, _) = mounted(5);
        puzzle.pool_cursor = 2;
        let picked = puzzle.pool[2];
        puzzle.confirm();
        assert_eq!(puzzle.slots[0], Some(picked));
        assert_eq!(puzzle.pool.len(), 6);

        // Return it, then place another: slot 0 is re-used first.
        puzzle.focus = WordFocus::Slots;
        puzzle.slot_cursor = 0;
        let events = puzzle.confirm();
        assert_eq!(events, vec![PuzzleEvent::FragmentReturned]);
        assert_eq!(puzzle.slots[0], None);
        assert_eq!(puzzle.pool.len(), 7);

        puzzle.focus = WordFocus::Pool;
        puzzle.pool_cursor = 0;
        puzzle.confirm();
        assert!(puzzle.slots[0].is_some());
    }

    #[test]
    fn returning_an_empty_slot_is_a_noop() {
        let (mut puzzle, _) = mounted(5);
        puzzle.focus = WordFocus::Slots;
        puzzle.slot_cursor = 3;
        assert!(puzzle.confirm().is_empty());
        assert_eq!(puzzle.pool.len(), 7);
    }

    #[test]
    fn correct_order_solves_after_the_suspense_window() {
        let (mut puzzle, mut watcher) = mounted(5);
        place_in_order(&mut puzzle);
        assert!(!puzzle.solved);
        assert!(!watcher.poll());

        puzzle.tick();
        let events = puzzle.tick();
        assert_eq!(events, vec![PuzzleEvent::PuzzleSolved]);
        assert!(puzzle.solved);
        assert!(watcher.poll());

        // Terminal: further input is ignored.
        puzzle.focus = WordFocus::Slots;
        puzzle.slot_cursor = 0;
        assert!(puzzle.confirm().is_empty());
    }

    #[test]
    fn wrong_order_resets_pool_and_slots() {
        let (mut puzzle, mut watcher) = mounted(5);
        // Swap the first two fragments, keep the rest in place: slot 0
        // holds order 1 and slot 1 holds order 0, guaranteed wrong.
        for order in [1, 0, 2, 3, 4, 5, 6] {
            let at = puzzle
                .pool
                .iter()
                .position(|f| f.order == order)
                .expect("fragment still in pool");
            puzzle.pool_cursor = at;
            puzzle.confirm();
        }
        assert_eq!(puzzle.slots[0].map(|f| f.order), Some(1));

        puzzle.tick();
        let events = puzzle.tick();
        assert_eq!(events, vec![PuzzleEvent::OrderMismatch]);
        assert!(puzzle.slots.iter().all(|s| s.is_none()));
        assert_eq!(puzzle.pool.len(), 7);
        assert!(!puzzle.solved);
        assert!(!watcher.poll());
    }

    #[test]
    fn returning_during_the_suspense_window_lapses_the_check() {
        let (mut puzzle, mut watcher) = mounted(5);
        place_in_order(&mut puzzle);

        puzzle.tick(); // countdown running
        puzzle.focus = WordFocus::Slots;
        puzzle.slot_cursor = 6;
        puzzle.confirm(); // pull the last fragment back out

        // The verdict tick sees an unfilled slot and does nothing.
        assert!(puzzle.tick().is_empty());
        assert!(!puzzle.solved);
        assert!(!watcher.poll());

        // Re-placing the fragment re-arms the verdict.
        puzzle.focus = WordFocus::Pool;
        puzzle.pool_cursor = puzzle.pool.len() - 1;
        puzzle.confirm();
        puzzle.tick();
        let events = puzzle.tick();
        assert_eq!(events, vec![PuzzleEvent::PuzzleSolved]);
        assert!(watcher.poll());
    }
}
