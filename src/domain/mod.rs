/// Pure path-puzzle logic: tile shapes, the grid, and the solver.
/// No timers, no input, no presentation — everything here is a plain
/// function of grid state, which keeps it directly unit-testable.

pub mod grid;
pub mod solver;
pub mod tile;
