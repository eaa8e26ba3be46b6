/// Connectivity solver for the path puzzle.
///
/// From the start tile, a breadth-first traversal walks the four cardinal
/// neighbors of each reached tile. A step is taken only when the current
/// tile opens on its exit side AND the neighbor opens on the facing side,
/// both rotation-normalized. Each tile is enqueued at most once, so a full
/// evaluation is O(n) in the number of tiles, and the resulting connected
/// set is a fixed point of the grid state: FIFO order cannot change it.

use std::collections::VecDeque;

use crate::domain::grid::PipeGrid;
use crate::domain::tile::{PipeKind, Side};

/// Recompute every tile's `connected` flag from scratch and report
/// whether the end tile was reached.
pub fn evaluate(grid: &mut PipeGrid) -> bool {
    let size = grid.size();
    for y in 0..size {
        for x in 0..size {
            grid.tile_mut(x, y).connected = false;
        }
    }

    let (sx, sy) = grid.start();
    grid.tile_mut(sx, sy).connected = true;

    let mut visited = vec![false; size * size];
    visited[sy * size + sx] = true;

    let mut frontier = VecDeque::new();
    frontier.push_back((sx, sy));

    let mut reached_end = false;

    while let Some((x, y)) = frontier.pop_front() {
        for side in Side::ALL {
            let (dx, dy) = side.offset();
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if visited[ny * size + nx] {
                continue;
            }
            let joined = grid.tile(x, y).opens_on(side)
                && grid.tile(nx, ny).opens_on(side.opposite());
            if joined {
                visited[ny * size + nx] = true;
                let neighbor = grid.tile_mut(nx, ny);
                neighbor.connected = true;
                if neighbor.kind == PipeKind::End {
                    reached_end = true;
                }
                frontier.push_back((nx, ny));
            }
        }
    }

    reached_end
}
