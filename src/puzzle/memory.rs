/// Memory puzzle: watch a growing symbol sequence, then replay it.
///
/// Each round appends one random pad to the sequence, plays the whole
/// sequence back at a fixed tempo, then waits for the player to repeat
/// it. A wrong press clears the player's partial input and replays the
/// same sequence after a short feedback pause — the sequence itself is
/// never regenerated. After the final round's sequence is reproduced in
/// full, the puzzle latches solved and fires after the feedback pause.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TimingConfig;
use crate::puzzle::completion::CompletionSignal;
use crate::puzzle::{tick_down, PuzzleEvent};

/// Pads, in display order: moon, star, leaf, sun.
pub const PAD_COUNT: usize = 4;
pub const PAD_NAMES: [&str; PAD_COUNT] = ["moon", "star", "leaf", "sun"];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemoryState {
    /// Waiting out the pause before the next round's playback.
    RoundPause,
    /// Replaying the sequence; input is ignored.
    Playback,
    /// The player's turn.
    Awaiting,
    /// Mismatch feedback window before the replay starts.
    MismatchPause,
    /// Terminal.
    Solved,
}

pub struct MemoryPuzzle {
    pub state: MemoryState,
    pub sequence: Vec<usize>,
    /// Correct presses so far in the current attempt.
    pub entered: usize,
    /// 1-based, grows to `rounds`.
    pub round: usize,
    pub rounds: usize,
    /// Pad currently lit (playback or press feedback), for display.
    pub lit: Option<usize>,
    pub solved: bool,

    lit_for: Option<u32>,
    /// Playback position; the symbol at this index plays next.
    play_at: usize,
    step_in: Option<u32>,
    pause_in: Option<u32>,
    fire_in: Option<u32>,

    playback_step: u32,
    playback_flash: u32,
    round_pause: u32,
    mismatch_pause: u32,
    solve_pause: u32,

    signal: CompletionSignal,
    rng: StdRng,
}

impl MemoryPuzzle {
    pub fn new(
        timing: &TimingConfig,
        rounds: usize,
        rng: &mut impl Rng,
        signal: CompletionSignal,
    ) -> Self {
        MemoryPuzzle {
            state: MemoryState::RoundPause,
            sequence: vec![],
            entered: 0,
            round: 1,
            rounds,
            lit: None,
            solved: false,
            lit_for: None,
            play_at: 0,
            step_in: None,
            pause_in: Some(timing.round_pause),
            fire_in: None,
            playback_step: timing.playback_step,
            playback_flash: timing.playback_flash,
            round_pause: timing.round_pause,
            mismatch_pause: timing.mismatch_pause,
            solve_pause: timing.solve_pause,
            signal,
            rng: StdRng::from_rng(rng),
        }
    }

    /// Player pressed pad `pad`. Ignored outside the awaiting state, so
    /// presses during playback or pauses fall through silently.
    pub fn press_pad(&mut self, pad: usize) -> Vec<PuzzleEvent> {
        if self.state != MemoryState::Awaiting || pad >= PAD_COUNT {
            return vec![];
        }

        self.lit = Some(pad);
        self.lit_for = Some(self.playback_flash / 2 + 1);
        let mut events = vec![PuzzleEvent::PadPressed(pad)];

        if self.sequence[self.entered] != pad {
            // Wrong: drop the partial input, replay the same sequence.
            self.entered = 0;
            self.state = MemoryState::MismatchPause;
            self.pause_in = Some(self.mismatch_pause);
            events.push(PuzzleEvent::SequenceMismatch);
            return events;
        }

        self.entered += 1;
        if self.entered < self.sequence.len() {
            return events;
        }

        // Full sequence reproduced.
        if self.round == self.rounds {
            self.solved = true;
            self.state = MemoryState::Solved;
            self.fire_in = Some(self.solve_pause);
            events.push(PuzzleEvent::PuzzleSolved);
        } else {
            self.round += 1;
            self.state = MemoryState::RoundPause;
            self.pause_in = Some(self.round_pause);
        }
        events
    }

    pub fn tick(&mut self) -> Vec<PuzzleEvent> {
        let mut events = vec![];

        if tick_down(&mut self.lit_for) {
            self.lit = None;
        }

        match self.state {
            MemoryState::RoundPause => {
                if tick_down(&mut self.pause_in) {
                    let next = self.rng.random_range(0..PAD_COUNT);
                    self.sequence.push(next);
                    self.entered = 0;
                    self.start_playback();
                }
            }
            MemoryState::MismatchPause => {
                if tick_down(&mut self.pause_in) {
                    self.start_playback();
                }
            }
            MemoryState::Playback => {
                if tick_down(&mut self.step_in) {
                    if self.play_at < self.sequence.len() {
                        let pad = self.sequence[self.play_at];
                        self.lit = Some(pad);
                        self.lit_for = Some(self.playback_flash);
                        self.play_at += 1;
                        self.step_in = Some(self.playback_step);
                        events.push(PuzzleEvent::PlaybackStep(pad));
                    } else {
                        self.state = MemoryState::Awaiting;
                    }
                }
            }
            MemoryState::Awaiting => {}
            MemoryState::Solved => {
                if tick_down(&mut self.fire_in) {
                    self.signal.fire();
                }
            }
        }

        events
    }

    fn start_playback(&mut self) {
        self.state = MemoryState::Playback;
        self.play_at = 0;
        self.step_in = Some(1);
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

    fn mounted(rounds: usize) -> (MemoryPuzzle, CompletionWatcher) {
        let (signal, watcher) = completion::channel();
        let mut seed_rng = StdRng::seed_from_u64(11);
        (
            MemoryPuzzle::new(&timing(), rounds, &mut seed_rng, signal),
            watcher,
        )
    }

    /// Tick until the puzzle hands control to the player.
    fn run_to_awaiting(puzzle: &mut MemoryPuzzle) -> Vec<PuzzleEvent> {
        let mut events = vec![];
        for _ in 0..200 {
            events.extend(puzzle.tick());
            if puzzle.state == MemoryState::Awaiting {
                return events;
            }
        }
        panic!("playback never finished");
    }

    /// Press the full current sequence correctly.
    fn replay_sequence(puzzle: &mut MemoryPuzzle) -> Vec<PuzzleEvent> {
        let seq = puzzle.sequence.clone();
        let mut events = vec![];
        for pad in seq {
            events.extend(puzzle.press_pad(pad));
        }
        events
    }

    #[test]
    fn playback_paces_one_symbol_per_step() {
        let (mut puzzle, _) = mounted(4);
        let events = run_to_awaiting(&mut puzzle);
        assert_eq!(puzzle.sequence.len(), 1);
        let steps: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, PuzzleEvent::PlaybackStep(_)))
            .collect();
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn presses_during_playback_are_ignored() {
        let (mut puzzle, _) = mounted(4);
        // Still in the opening pause: nothing to press yet.
        assert!(puzzle.press_pad(0).is_empty());
        puzzle.tick();
        puzzle.tick(); // round pause expired, playback begins
        assert_eq!(puzzle.state, MemoryState::Playback);
        assert!(puzzle.press_pad(0).is_empty());
        assert_eq!(puzzle.entered, 0);
    }

    #[test]
    fn sequence_grows_by_one_each_round() {
        let (mut puzzle, _) = mounted(4);
        for expected_len in 1..=3 {
            run_to_awaiting(&mut puzzle);
            assert_eq!(puzzle.sequence.len(), expected_len);
            replay_sequence(&mut puzzle);
        }
        assert_eq!(puzzle.round, 4);
    }

    #[test]
    fn mismatch_clears_input_and_replays_the_same_sequence() {
        let (mut puzzle, _) = mounted(4);
        run_to_awaiting(&mut puzzle);
        replay_sequence(&mut puzzle);
        run_to_awaiting(&mut puzzle);
        let seq_before = puzzle.sequence.clone();
        assert_eq!(seq_before.len(), 2);

        // First press correct, second wrong.
        puzzle.press_pad(seq_before[0]);
        let wrong = (seq_before[1] + 1) % PAD_COUNT;
        let events = puzzle.press_pad(wrong);
        assert!(events.contains(&PuzzleEvent::SequenceMismatch));
        assert_eq!(puzzle.entered, 0);
        assert_eq!(puzzle.state, MemoryState::MismatchPause);
        assert_eq!(puzzle.round, 2, "a mismatch never advances the round");

        // The replay carries the identical sequence.
        run_to_awaiting(&mut puzzle);
        assert_eq!(puzzle.sequence, seq_before);

        // Length-L sequence advances after exactly L correct inputs.
        let events = replay_sequence(&mut puzzle);
        assert!(!events.contains(&PuzzleEvent::SequenceMismatch));
        assert_eq!(puzzle.round, 3);
    }

    #[test]
    fn final_round_solves_and_fires_once() {
        let (mut puzzle, mut watcher) = mounted(2);
        run_to_awaiting(&mut puzzle);
        replay_sequence(&mut puzzle);
        run_to_awaiting(&mut puzzle);
        let events = replay_sequence(&mut puzzle);
        assert!(events.contains(&PuzzleEvent::PuzzleSolved));
        assert_eq!(puzzle.state, MemoryState::Solved);

        assert!(!watcher.poll());
        for _ in 0..3 {
            puzzle.tick();
        }
        assert!(watcher.poll());

        // Terminal: more presses and ticks change nothing.
        assert!(puzzle.press_pad(0).is_empty());
        for _ in 0..8 {
            puzzle.tick();
        }
        assert!(watcher.poll());
    }
}
