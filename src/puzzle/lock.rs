/// Lock puzzle: cycle three rings until they spell the key.
///
/// Each ring cycles independently through the same option list with
/// wrap-around arithmetic. Every turn compares the live combination
/// against the fixed target; on a full match the lock latches open —
/// the solved state is terminal, so turning rings afterwards can never
/// re-fire completion.

use crate::config::TimingConfig;
use crate::puzzle::completion::CompletionSignal;
use crate::puzzle::{tick_down, PuzzleEvent};

pub const RING_COUNT: usize = 3;
pub const OPTION_COUNT: usize = 6;

/// Option glyph names, indexed by ring position.
pub const OPTION_NAMES: [&str; OPTION_COUNT] = ["sun", "star", "moon", "leaf", "heart", "cloud"];

/// The key: moon, heart, star.
pub const TARGET: [usize; RING_COUNT] = [2, 4, 1];

pub struct LockPuzzle {
    pub rings: [usize; RING_COUNT],
    /// Selected ring, moved with left/right.
    pub cursor: usize,
    pub solved: bool,

    fire_in: Option<u32>,
    solve_pause: u32,
    signal: CompletionSignal,
}

impl LockPuzzle {
    pub fn new(timing: &TimingConfig, signal: CompletionSignal) -> Self {
        LockPuzzle {
            rings: [0; RING_COUNT],
            cursor: 0,
            solved: false,
            fire_in: None,
            solve_pause: timing.solve_pause,
            signal,
        }
    }

    pub fn select_ring(&mut self, delta: i32) {
        let next = self.cursor as i32 + delta;
        if next >= 0 && (next as usize) < RING_COUNT {
            self.cursor = next as usize;
        }
    }

    /// Cycle the selected ring one step forward (+1) or backward (-1).
    /// Ignored once the lock is open.
    pub fn turn(&mut self, dir: i32) -> Vec<PuzzleEvent> {
        if self.solved {
            return vec![];
        }
        let count = OPTION_COUNT as i32;
        let current = self.rings[self.cursor] as i32;
        self.rings[self.cursor] = ((current + dir).rem_euclid(count)) as usize;

        let mut events = vec![PuzzleEvent::RingTurned];
        if self.rings == TARGET {
            self.solved = true;
            self.fire_in = Some(self.solve_pause);
            events.push(PuzzleEvent::Unlocked);
            events.push(PuzzleEvent::PuzzleSolved);
        }
        events
    }

    pub fn tick(&mut self) -> Vec<PuzzleEvent> {
        if tick_down(&mut self.fire_in) {
            self.signal.fire();
        }
        vec![]
    }
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

    fn mounted() -> (LockPuzzle, CompletionWatcher) {
        let (signal, watcher) = completion::channel();
        (LockPuzzle::new(&timing(), signal), watcher)
    }

    fn dial_to_target(puzzle: &mut LockPuzzle) -> Vec<PuzzleEvent> {
        let mut events = vec![];
        for (ring, &target) in TARGET.iter().enumerate() {
            puzzle.cursor = ring;
            while puzzle.rings[ring] != target {
                events.extend(puzzle.turn(1));
            }
        }
        events
    }

    #[test]
    fn rings_wrap_in_both_directions() {
        let (mut puzzle, _) = mounted();
        puzzle.turn(-1);
        assert_eq!(puzzle.rings[0], OPTION_COUNT - 1);
        puzzle.turn(1);
        assert_eq!(puzzle.rings[0], 0);
        for _ in 0..OPTION_COUNT {
            puzzle.turn(1);
        }
        assert_eq!(puzzle.rings[0], 0);
    }

    #[test]
    fn ring_selection_is_clamped() {
        let (mut puzzle, _) = mounted();
        puzzle.select_ring(-1);
        assert_eq!(puzzle.cursor, 0);
        for _ in 0..5 {
            puzzle.select_ring(1);
        }
        assert_eq!(puzzle.cursor, RING_COUNT - 1);
    }

    #[test]
    fn partial_matches_do_not_unlock() {
        let (mut puzzle, mut watcher) = mounted();
        puzzle.cursor = 0;
        puzzle.turn(1);
        puzzle.turn(1); // ring 0 on target, others not
        assert_eq!(puzzle.rings[0], TARGET[0]);
        assert!(!puzzle.solved);
        for _ in 0..10 {
            puzzle.tick();
        }
        assert!(!watcher.poll());
    }

    #[test]
    fn full_match_fires_exactly_once_despite_further_turns() {
        let (mut puzzle, mut watcher) = mounted();
        let events = dial_to_target(&mut puzzle);
        assert!(events.contains(&PuzzleEvent::Unlocked));
        assert!(puzzle.solved);

        // Turning after the match is swallowed: the combination can no
        // longer leave the target, so completion cannot re-arm.
        assert!(puzzle.turn(1).is_empty());
        assert_eq!(puzzle.rings, TARGET);

        assert!(!watcher.poll());
        for _ in 0..3 {
            puzzle.tick();
        }
        assert!(watcher.poll());

        assert!(puzzle.turn(-1).is_empty());
        for _ in 0..6 {
            puzzle.tick();
        }
        assert!(watcher.poll());
    }
}
