/// Path puzzle: rotate pipe tiles until the start connects to the end.
///
/// The solver never runs directly from the input handler. A rotation
/// only schedules a re-evaluation a short debounce later, and each new
/// rotation restarts that countdown, so a burst of turns costs one
/// evaluation and the evaluation always sees the latest grid. Once the
/// end is reached the puzzle latches solved, ignores further input, and
/// fires its completion signal after the feedback pause.

use rand::Rng;

use crate::config::TimingConfig;
use crate::domain::grid::{PipeGrid, GRID_SIZE};
use crate::domain::solver;
use crate::puzzle::completion::CompletionSignal;
use crate::puzzle::{tick_down, PuzzleEvent};

pub struct PathPuzzle {
    pub grid: PipeGrid,
    /// Selected cell, moved with the arrow keys.
    pub cursor: (usize, usize),
    pub solved: bool,

    eval_in: Option<u32>,
    fire_in: Option<u32>,
    debounce: u32,
    solve_pause: u32,
    signal: CompletionSignal,
}

impl PathPuzzle {
    pub fn new(timing: &TimingConfig, rng: &mut impl Rng, signal: CompletionSignal) -> Self {
        Self::with_grid(PipeGrid::generate(GRID_SIZE, rng), timing, signal)
    }

    /// A randomly generated grid may already connect, so the solver runs
    /// once shortly after mount even before any input.
    fn with_grid(grid: PipeGrid, timing: &TimingConfig, signal: CompletionSignal) -> Self {
        PathPuzzle {
            grid,
            cursor: (0, 0),
            solved: false,
            eval_in: Some(timing.solver_debounce),
            fire_in: None,
            debounce: timing.solver_debounce,
            solve_pause: timing.solve_pause,
            signal,
        }
    }

    #[cfg(test)]
    pub fn with_fixed_grid(grid: PipeGrid, timing: &TimingConfig, signal: CompletionSignal) -> Self {
        Self::with_grid(grid, timing, signal)
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.cursor;
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if self.grid.in_bounds(nx, ny) {
            self.cursor = (nx as usize, ny as usize);
        }
    }

    /// Rotate the tile under the cursor. Silently ignored once solved or
    /// when the cursor sits on a fixed tile.
    pub fn rotate_selected(&mut self) -> Vec<PuzzleEvent> {
        if self.solved {
            return vec![];
        }
        let (x, y) = self.cursor;
        if !self.grid.rotate(x, y) {
            return vec![];
        }
        self.eval_in = Some(self.debounce);
        vec![PuzzleEvent::TileRotated]
    }

    pub fn tick(&mut self) -> Vec<PuzzleEvent> {
        let mut events = vec![];

        if tick_down(&mut self.eval_in) {
            let reached = solver::evaluate(&mut self.grid);
            if reached && !self.solved {
                self.solved = true;
                self.fire_in = Some(self.solve_pause);
                events.push(PuzzleEvent::PuzzleSolved);
            }
        }

        if tick_down(&mut self.fire_in) {
            self.signal.fire();
        }

        events
    }
}
