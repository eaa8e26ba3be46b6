/// The step layer: applies player moves and advances time.
///
/// Moves are applied synchronously, one at a time, in the order the
/// frontend drained them — no two moves interleave mid-update. Time
/// advances in fixed ticks; each tick is forwarded to the mounted
/// puzzle (whose countdowns re-read current state when they expire) and
/// then the completion watcher is polled. When a puzzle reports done,
/// it is unmounted on the spot, which cancels anything it still had
/// pending.

use crate::puzzle::{PuzzleEvent, PuzzleMove};
use crate::sim::world::{ActivePuzzle, Phase, WorldState};

/// Route one player move to the mounted puzzle.
pub fn apply_move(world: &mut WorldState, mv: PuzzleMove) -> Vec<PuzzleEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }
    let Some(puzzle) = world.puzzle.as_mut() else {
        return vec![];
    };

    match puzzle {
        ActivePuzzle::Path(p) => match mv {
            PuzzleMove::Up => {
                p.move_cursor(0, -1);
                vec![]
            }
            PuzzleMove::Down => {
                p.move_cursor(0, 1);
                vec![]
            }
            PuzzleMove::Left => {
                p.move_cursor(-1, 0);
                vec![]
            }
            PuzzleMove::Right => {
                p.move_cursor(1, 0);
                vec![]
            }
            PuzzleMove::Confirm => p.rotate_selected(),
            PuzzleMove::Pad(_) => vec![],
        },
        ActivePuzzle::Slide(p) => match mv {
            PuzzleMove::Up => {
                p.move_cursor(0, -1);
                vec![]
            }
            PuzzleMove::Down => {
                p.move_cursor(0, 1);
                vec![]
            }
            PuzzleMove::Left => {
                p.move_cursor(-1, 0);
                vec![]
            }
            PuzzleMove::Right => {
                p.move_cursor(1, 0);
                vec![]
            }
            PuzzleMove::Confirm => p.slide_selected(),
            PuzzleMove::Pad(_) => vec![],
        },
        ActivePuzzle::Memory(p) => match mv {
            PuzzleMove::Pad(i) => p.press_pad(i),
            _ => vec![],
        },
        ActivePuzzle::Lock(p) => match mv {
            PuzzleMove::Left => {
                p.select_ring(-1);
                vec![]
            }
            PuzzleMove::Right => {
                p.select_ring(1);
                vec![]
            }
            PuzzleMove::Up => p.turn(1),
            PuzzleMove::Down => p.turn(-1),
            PuzzleMove::Confirm | PuzzleMove::Pad(_) => vec![],
        },
        ActivePuzzle::Word(p) => {
            use crate::puzzle::word::WordFocus;
            match mv {
                PuzzleMove::Up => {
                    p.switch_focus(WordFocus::Slots);
                    vec![]
                }
                PuzzleMove::Down => {
                    p.switch_focus(WordFocus::Pool);
                    vec![]
                }
                PuzzleMove::Left => {
                    p.move_cursor(-1);
                    vec![]
                }
                PuzzleMove::Right => {
                    p.move_cursor(1);
                    vec![]
                }
                PuzzleMove::Confirm => p.confirm(),
                PuzzleMove::Pad(_) => vec![],
            }
        }
    }
}

/// Advance the world one tick.
pub fn tick(world: &mut WorldState) -> Vec<PuzzleEvent> {
    world.anim_tick = world.anim_tick.wrapping_add(1);
    if world.phase != Phase::Playing {
        return vec![];
    }

    let mut events = match world.puzzle.as_mut() {
        Some(puzzle) => puzzle.tick(),
        None => vec![],
    };

    let finished = world
        .watcher
        .as_mut()
        .map(|w| w.poll())
        .unwrap_or(false);

    if finished {
        world.puzzle = None;
        world.watcher = None;
        world.phase = Phase::LevelComplete;
        world.anim_tick = 0;
        events.push(PuzzleEvent::LevelFinished);
    }

    events
}
