/// Pipe tile shapes, sides, and the rotation-aware connection test.
/// Connection semantics are queried via methods, not stored as flags,
/// so all open-side logic is centralized here.

/// One edge of a tile. The discriminant is the side index used for
/// rotation arithmetic: rotating a tile by 90° clockwise shifts every
/// open side one index forward.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Right, Side::Down, Side::Left, Side::Up];

    /// The side of the neighbor facing back at us.
    pub fn opposite(self) -> Side {
        Side::from_index((self.index() + 2) % 4)
    }

    /// Grid offset toward the neighbor across this side.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Side::Right => (1, 0),
            Side::Down => (0, 1),
            Side::Left => (-1, 0),
            Side::Up => (0, -1),
        }
    }

    pub fn index(self) -> u16 {
        self as u16
    }

    fn from_index(i: u16) -> Side {
        match i % 4 {
            0 => Side::Right,
            1 => Side::Down,
            2 => Side::Left,
            _ => Side::Up,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PipeKind {
    /// Opens Right and Left at rotation 0.
    Straight,
    /// Opens Right and Down at rotation 0 (a └ turned on its side).
    Corner,
    /// Opens Right only at rotation 0. Fixed at the grid origin.
    Start,
    /// Accepts a connection from any side. Fixed at the far corner.
    End,
}

/// One cell of the path grid. Position is implied by the cell's index in
/// the grid, so only shape, orientation, and solver state live here.
#[derive(Clone, Copy, Debug)]
pub struct PipeTile {
    pub kind: PipeKind,
    /// Degrees clockwise: always one of 0, 90, 180, 270.
    pub rotation: u16,
    /// Fixed tiles (start, end) never rotate.
    pub fixed: bool,
    /// Reachable from the start tile under current rotations.
    /// Owned by the solver; display-only everywhere else.
    pub connected: bool,
}

impl PipeTile {
    pub fn new(kind: PipeKind, rotation: u16) -> Self {
        let fixed = matches!(kind, PipeKind::Start | PipeKind::End);
        PipeTile { kind, rotation, fixed, connected: false }
    }

    /// Advance the tile one quarter turn clockwise.
    /// Callers must check `fixed` first; the grid enforces this.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Does this tile permit a connection on `side`, at its current
    /// rotation? The shape's open sides are defined at rotation 0; the
    /// queried side is normalized back by the rotation step count.
    pub fn opens_on(&self, side: Side) -> bool {
        let steps = self.rotation / 90;
        let local = Side::from_index((side.index() + 4 - steps) % 4);
        match self.kind {
            PipeKind::Start => local == Side::Right,
            PipeKind::End => true,
            PipeKind::Straight => matches!(local, Side::Right | Side::Left),
            PipeKind::Corner => matches!(local, Side::Right | Side::Down),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rotations_return_to_origin() {
        let mut t = PipeTile::new(PipeKind::Corner, 90);
        for r in 1..=8u32 {
            t.rotate();
            assert_eq!(t.rotation == 90, r % 4 == 0, "after {r} rotations");
        }
    }

    #[test]
    fn straight_opens_left_right_then_up_down() {
        let t = PipeTile::new(PipeKind::Straight, 0);
        assert!(t.opens_on(Side::Right) && t.opens_on(Side::Left));
        assert!(!t.opens_on(Side::Up) && !t.opens_on(Side::Down));

        let t = PipeTile::new(PipeKind::Straight, 90);
        assert!(t.opens_on(Side::Up) && t.opens_on(Side::Down));
        assert!(!t.opens_on(Side::Right) && !t.opens_on(Side::Left));

        // A straight is symmetric under 180°
        let t = PipeTile::new(PipeKind::Straight, 180);
        assert!(t.opens_on(Side::Right) && t.opens_on(Side::Left));
    }

    #[test]
    fn corner_tracks_rotation() {
        // Rotation 0: Right + Down. Each quarter turn shifts both sides.
        let expected = [
            (0, [Side::Right, Side::Down]),
            (90, [Side::Down, Side::Left]),
            (180, [Side::Left, Side::Up]),
            (270, [Side::Up, Side::Right]),
        ];
        for (rot, open) in expected {
            let t = PipeTile::new(PipeKind::Corner, rot);
            for side in Side::ALL {
                assert_eq!(
                    t.opens_on(side),
                    open.contains(&side),
                    "rot {rot} side {side:?}"
                );
            }
        }
    }

    #[test]
    fn start_opens_right_only_end_opens_everywhere() {
        let start = PipeTile::new(PipeKind::Start, 0);
        assert!(start.opens_on(Side::Right));
        assert!(!start.opens_on(Side::Down));
        assert!(!start.opens_on(Side::Left));
        assert!(!start.opens_on(Side::Up));
        assert!(start.fixed);

        let end = PipeTile::new(PipeKind::End, 0);
        for side in Side::ALL {
            assert!(end.opens_on(side));
        }
        assert!(end.fixed);
    }

    #[test]
    fn opposite_sides_pair_up() {
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Down.opposite(), Side::Up);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Up.opposite(), Side::Down);
    }
}
