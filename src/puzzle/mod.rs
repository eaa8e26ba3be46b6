/// The five mini-game state machines and their shared protocol.
///
/// Every puzzle follows the same shape: local state, a win predicate,
/// and a `CompletionSignal` fired exactly once when the predicate first
/// holds. Puzzles advance on two inputs only — discrete player moves
/// applied synchronously, and `tick()` calls at the fixed simulation
/// rate, which drive all delays as plain countdowns. Dropping a puzzle
/// value cancels everything it had pending.

pub mod completion;
pub mod lock;
pub mod memory;
pub mod path;
pub mod slide;
pub mod word;

/// Advance a pending countdown by one tick. Returns true on the tick
/// the countdown expires, clearing the slot. `Some(0)` fires on the
/// next tick; `None` stays quiet.
pub(crate) fn tick_down(slot: &mut Option<u32>) -> bool {
    match slot {
        Some(remaining) => {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                *slot = None;
                true
            } else {
                false
            }
        }
        None => false,
    }
}

/// One discrete player intent, decoded from raw input by the frontend.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PuzzleMove {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    /// Direct pad press (memory puzzle), 0-based.
    Pad(usize),
}

/// Events emitted by puzzle state machines.
/// The presentation layer consumes these for sound feedback.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PuzzleEvent {
    /// Path: a tile turned a quarter step.
    TileRotated,
    /// Slide: a tile slid into the gap.
    TileSlid,
    /// Memory: a pad lit up during sequence playback.
    PlaybackStep(usize),
    /// Memory: the player pressed a pad.
    PadPressed(usize),
    /// Memory: wrong pad; input cleared, replay scheduled.
    SequenceMismatch,
    /// Lock: a ring cycled one step.
    RingTurned,
    /// Lock: the combination matched the key.
    Unlocked,
    /// Word: a fragment dropped into the first empty slot.
    FragmentPlaced,
    /// Word: a fragment went back to the pool.
    FragmentReturned,
    /// Word: the full phrase was wrong; pool and slots reset.
    OrderMismatch,
    /// Any: the win predicate latched (completion follows after the
    /// puzzle's feedback pause).
    PuzzleSolved,
    /// Host: the mounted puzzle's completion callback arrived.
    LevelFinished,
}
