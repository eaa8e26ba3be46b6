/// Sliding-tile puzzle: restore the 3×3 picture by sliding tiles into
/// the gap.
///
/// Shuffling applies a fixed number of legal random moves starting from
/// the solved layout, so every dealt position is reachable by legal
/// moves — solvability is guaranteed by construction, unlike the path
/// puzzle's free random deal. The win predicate is checked only after a
/// player-initiated swap.

use rand::Rng;

use crate::config::{PuzzleTuning, TimingConfig};
use crate::puzzle::completion::CompletionSignal;
use crate::puzzle::{tick_down, PuzzleEvent};

/// Edge length of the slide grid.
pub const SLIDE_SIZE: usize = 3;

/// The cell value that renders as the gap.
pub const GAP: u8 = (SLIDE_SIZE * SLIDE_SIZE - 1) as u8;

pub struct SlidePuzzle {
    /// Permutation of 0..9, row-major; the cell holding `GAP` is empty.
    pub cells: Vec<u8>,
    /// Selected cell index, moved with the arrow keys.
    pub cursor: usize,
    pub solved: bool,

    /// Index of the gap cell, maintained across swaps.
    gap: usize,
    fire_in: Option<u32>,
    solve_pause: u32,
    signal: CompletionSignal,
}

impl SlidePuzzle {
    pub fn new(
        timing: &TimingConfig,
        tuning: &PuzzleTuning,
        rng: &mut impl Rng,
        signal: CompletionSignal,
    ) -> Self {
        let mut cells: Vec<u8> = (0..(SLIDE_SIZE * SLIDE_SIZE) as u8).collect();
        let mut gap = cells.len() - 1;
        for _ in 0..tuning.shuffle_moves {
            let options = neighbors(gap);
            let pick = options[rng.random_range(0..options.len())];
            cells.swap(gap, pick);
            gap = pick;
        }
        SlidePuzzle {
            cells,
            cursor: 0,
            solved: false,
            gap,
            fire_in: None,
            solve_pause: timing.slide_solve_pause,
            signal,
        }
    }

    #[cfg(test)]
    pub fn with_cells(cells: Vec<u8>, timing: &TimingConfig, signal: CompletionSignal) -> Self {
        let gap = cells
            .iter()
            .position(|&v| v == GAP)
            .expect("fixture holds one gap");
        SlidePuzzle {
            cells,
            cursor: 0,
            solved: false,
            gap,
            fire_in: None,
            solve_pause: timing.slide_solve_pause,
            signal,
        }
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let x = (self.cursor % SLIDE_SIZE) as i32 + dx;
        let y = (self.cursor / SLIDE_SIZE) as i32 + dy;
        if x >= 0 && y >= 0 && (x as usize) < SLIDE_SIZE && (y as usize) < SLIDE_SIZE {
            self.cursor = y as usize * SLIDE_SIZE + x as usize;
        }
    }

    /// Slide the tile under the cursor into the gap. A cell that is not
    /// orthogonally adjacent to the gap (or the gap itself) is a no-op.
    pub fn slide_selected(&mut self) -> Vec<PuzzleEvent> {
        if self.solved {
            return vec![];
        }
        if self.cursor == self.gap || !neighbors(self.gap).contains(&self.cursor) {
            return vec![];
        }

        self.cells.swap(self.cursor, self.gap);
        self.gap = self.cursor;
        let mut events = vec![PuzzleEvent::TileSlid];

        if self.cells.iter().enumerate().all(|(i, &v)| v as usize == i) {
            self.solved = true;
            self.fire_in = Some(self.solve_pause);
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

    pub fn gap_index(&self) -> usize {
        self.gap
    }
}

/// Orthogonal neighbors of a cell index in the 3×3 layout.
fn neighbors(idx: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(4);
    if idx % SLIDE_SIZE > 0 {
        out.push(idx - 1);
    }
    if idx % SLIDE_SIZE < SLIDE_SIZE - 1 {
        out.push(idx + 1);
    }
    if idx >= SLIDE_SIZE {
        out.push(idx - SLIDE_SIZE);
    }
    if idx + SLIDE_SIZE < SLIDE_SIZE * SLIDE_SIZE {
        out.push(idx + SLIDE_SIZE);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::puzzle::completion::{self, CompletionWatcher};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn shuffled(seed: u64) -> (SlidePuzzle, CompletionWatcher) {
        let cfg = GameConfig::default_for_tests();
        let (signal, watcher) = completion::channel();
        let mut rng = StdRng::seed_from_u64(seed);
        (
            SlidePuzzle::new(&cfg.timing, &cfg.tuning, &mut rng, signal),
            watcher,
        )
    }

    fn near_win() -> (SlidePuzzle, CompletionWatcher) {
        // One slide from solved: the gap sits at index 7, tile 7 at 8.
        let cfg = GameConfig::default_for_tests();
        let (signal, watcher) = completion::channel();
        let cells = vec![0, 1, 2, 3, 4, 5, 6, GAP, 7];
        (
            SlidePuzzle::with_cells(cells, &cfg.timing, signal),
            watcher,
        )
    }

    #[test]
    fn shuffle_is_a_permutation_with_one_gap() {
        for seed in 0..32 {
            let (puzzle, _) = shuffled(seed);
            let mut seen = puzzle.cells.clone();
            seen.sort_unstable();
            let expected: Vec<u8> = (0..(SLIDE_SIZE * SLIDE_SIZE) as u8).collect();
            assert_eq!(seen, expected, "seed {seed}");
        }
    }

    #[test]
    fn shuffle_stays_solvable_by_replaying_legal_moves() {
        // Every shuffle position must be reachable from identity by
        // legal moves; equivalently, greedy reverse search solves it.
        // Here we just verify the invariant the construction relies on:
        // a gap neighbor swap is always legal, so the shuffle walk never
        // leaves the legal-move graph, and the identity stays reachable.
        for seed in 0..8 {
            let (puzzle, _) = shuffled(seed);
            let gap = puzzle.gap_index();
            assert_eq!(puzzle.cells[gap], GAP);
            for n in neighbors(gap) {
                assert!(n < SLIDE_SIZE * SLIDE_SIZE);
            }
        }
    }

    #[test]
    fn non_adjacent_selection_never_changes_the_grid() {
        let (mut puzzle, _) = near_win();
        // Gap is at 7; cell 0 is not adjacent.
        puzzle.cursor = 0;
        assert!(puzzle.slide_selected().is_empty());
        assert_eq!(puzzle.cells, vec![0, 1, 2, 3, 4, 5, 6, GAP, 7]);

        // Selecting the gap itself is equally inert.
        puzzle.cursor = 7;
        assert!(puzzle.slide_selected().is_empty());
        assert_eq!(puzzle.cells, vec![0, 1, 2, 3, 4, 5, 6, GAP, 7]);
    }

    #[test]
    fn row_boundaries_do_not_count_as_adjacent() {
        // Index 2 (end of row 0) and index 3 (start of row 1) differ by
        // one but sit on different rows.
        assert!(!neighbors(3).contains(&2));
        assert!(!neighbors(2).contains(&3));
    }

    #[test]
    fn final_swap_solves_and_fires_once() {
        let (mut puzzle, mut watcher) = near_win();
        puzzle.cursor = 8;
        let events = puzzle.slide_selected();
        assert!(events.contains(&PuzzleEvent::TileSlid));
        assert!(events.contains(&PuzzleEvent::PuzzleSolved));
        assert!(puzzle.solved);

        assert!(!watcher.poll());
        for _ in 0..puzzle.solve_pause {
            puzzle.tick();
        }
        assert!(watcher.poll());

        // Solved is terminal: further selections are ignored.
        puzzle.cursor = 5;
        assert!(puzzle.slide_selected().is_empty());
        for _ in 0..4 {
            puzzle.tick();
        }
        assert!(watcher.poll());
    }
}
