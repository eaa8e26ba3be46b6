/// The path-puzzle grid: a square arrangement of pipe tiles with a fixed
/// start at the origin and a fixed end at the far corner.
///
/// Generation draws interior tiles from a weighted choice between the two
/// connector shapes and a uniformly random rotation. There is no
/// construction-time solvability check: whether the grid can be solved is
/// emergent from the random rotations, and the host offers a regenerate
/// path for the rare dud.

use rand::Rng;

use crate::domain::tile::{PipeKind, PipeTile};

/// Grid edge length for the path puzzle.
pub const GRID_SIZE: usize = 4;

/// Probability that an interior tile is a corner (the rest are straights).
const CORNER_WEIGHT: f64 = 0.6;

pub struct PipeGrid {
    size: usize,
    /// Row-major: `tiles[y * size + x]`.
    tiles: Vec<PipeTile>,
}

impl PipeGrid {
    /// Build a fresh `size`×`size` grid. Start sits at (0,0) opening
    /// rightward, end at (size-1, size-1); every other cell gets a random
    /// connector shape and rotation.
    pub fn generate(size: usize, rng: &mut impl Rng) -> Self {
        assert!(size >= 2, "grid needs room for both endpoints");
        let mut tiles = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let tile = if (x, y) == (0, 0) {
                    PipeTile::new(PipeKind::Start, 0)
                } else if (x, y) == (size - 1, size - 1) {
                    PipeTile::new(PipeKind::End, 0)
                } else {
                    let kind = if rng.random_bool(CORNER_WEIGHT) {
                        PipeKind::Corner
                    } else {
                        PipeKind::Straight
                    };
                    let rotation = rng.random_range(0..4u16) * 90;
                    PipeTile::new(kind, rotation)
                };
                tiles.push(tile);
            }
        }
        PipeGrid { size, tiles }
    }

    /// Test/fixture constructor: a grid from explicit tiles, row-major.
    /// Endpoint invariants are the caller's responsibility.
    #[cfg(test)]
    pub fn from_tiles(size: usize, tiles: Vec<PipeTile>) -> Self {
        assert_eq!(tiles.len(), size * size);
        PipeGrid { size, tiles }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> (usize, usize) {
        (0, 0)
    }

    pub fn end(&self) -> (usize, usize) {
        (self.size - 1, self.size - 1)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    pub fn tile(&self, x: usize, y: usize) -> &PipeTile {
        &self.tiles[y * self.size + x]
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> &mut PipeTile {
        &mut self.tiles[y * self.size + x]
    }

    /// Rotate the tile at (x, y) one quarter turn. Fixed tiles are left
    /// untouched; the return value says whether anything changed.
    pub fn rotate(&mut self, x: usize, y: usize) -> bool {
        let tile = self.tile_mut(x, y);
        if tile.fixed {
            return false;
        }
        tile.rotate();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generate_places_unique_fixed_endpoints() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = PipeGrid::generate(GRID_SIZE, &mut rng);

        let mut starts = 0;
        let mut ends = 0;
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let t = grid.tile(x, y);
                match t.kind {
                    PipeKind::Start => {
                        starts += 1;
                        assert_eq!((x, y), grid.start());
                        assert!(t.fixed && t.rotation == 0);
                    }
                    PipeKind::End => {
                        ends += 1;
                        assert_eq!((x, y), grid.end());
                        assert!(t.fixed && t.rotation == 0);
                    }
                    PipeKind::Straight | PipeKind::Corner => {
                        assert!(!t.fixed);
                        assert!(t.rotation % 90 == 0 && t.rotation < 360);
                    }
                }
            }
        }
        assert_eq!(starts, 1);
        assert_eq!(ends, 1);
    }

    #[test]
    fn rotate_is_a_noop_on_fixed_tiles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = PipeGrid::generate(GRID_SIZE, &mut rng);
        let (ex, ey) = grid.end();

        assert!(!grid.rotate(0, 0));
        assert!(!grid.rotate(ex, ey));
        assert_eq!(grid.tile(0, 0).rotation, 0);
        assert_eq!(grid.tile(ex, ey).rotation, 0);
    }

    #[test]
    fn rotate_steps_interior_tiles_by_quarter_turns() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = PipeGrid::generate(GRID_SIZE, &mut rng);
        let before = grid.tile(1, 2).rotation;

        assert!(grid.rotate(1, 2));
        assert_eq!(grid.tile(1, 2).rotation, (before + 90) % 360);

        for _ in 0..3 {
            grid.rotate(1, 2);
        }
        assert_eq!(grid.tile(1, 2).rotation, before);
    }

    #[test]
    fn every_cell_is_populated() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let grid = PipeGrid::generate(GRID_SIZE, &mut rng);
            assert_eq!(grid.tiles.len(), GRID_SIZE * GRID_SIZE);
        }
    }
}
