/// Level descriptors and the level mounter.
///
/// The five levels are embedded, one per puzzle kind, each carrying
/// only display text plus the kind used to pick which mini-game to
/// mount. Mounting builds a fresh completion channel: the puzzle gets
/// the signal half, the world keeps the watcher.

use crate::config::GameConfig;
use crate::puzzle::completion;
use crate::puzzle::lock::LockPuzzle;
use crate::puzzle::memory::MemoryPuzzle;
use crate::puzzle::path::PathPuzzle;
use crate::puzzle::slide::SlidePuzzle;
use crate::puzzle::word::WordPuzzle;
use crate::sim::world::{ActivePuzzle, Phase, WorldState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PuzzleKind {
    Path,
    Slide,
    Memory,
    Lock,
    Word,
}

pub struct LevelDef {
    pub id: u32,
    pub kind: PuzzleKind,
    pub title: &'static str,
    pub instruction: &'static str,
    pub reward: &'static str,
}

pub const LEVELS: [LevelDef; 5] = [
    LevelDef {
        id: 1,
        kind: PuzzleKind::Path,
        title: "Connect the Path",
        instruction: "Rotate the tiles to link start to end",
        reward: "No matter how the pieces turn, a way through always appears.",
    },
    LevelDef {
        id: 2,
        kind: PuzzleKind::Slide,
        title: "Fragmented Memory",
        instruction: "Slide the pieces until the picture is whole",
        reward: "Scattered memories still make one picture, once you put them together.",
    },
    LevelDef {
        id: 3,
        kind: PuzzleKind::Memory,
        title: "Symbol Sequence",
        instruction: "Watch the pattern, then repeat it",
        reward: "Small moments have a way of staying in mind longer than you think.",
    },
    LevelDef {
        id: 4,
        kind: PuzzleKind::Lock,
        title: "The Lockbox",
        instruction: "Align the rings to match the key",
        reward: "Some things stay locked away until the right combination comes along.",
    },
    LevelDef {
        id: 5,
        kind: PuzzleKind::Word,
        title: "Assemble the Message",
        instruction: "Place the fragments in the right order",
        reward: "Every piece of this box, every puzzle inside it, was leading here.",
    },
];

pub const FINAL_LINE: &str =
    "What breaks into pieces can always be put back together.";

/// Mount level `level_idx` into the world. Stepping past the last level
/// lands on the game-complete screen instead.
pub fn load_level(world: &mut WorldState, level_idx: usize, config: &GameConfig) {
    if level_idx >= LEVELS.len() {
        world.puzzle = None;
        world.watcher = None;
        world.phase = Phase::GameComplete;
        world.anim_tick = 0;
        return;
    }

    let (signal, watcher) = completion::channel();
    let mut rng = rand::rng();
    let timing = &config.timing;

    let puzzle = match LEVELS[level_idx].kind {
        PuzzleKind::Path => ActivePuzzle::Path(PathPuzzle::new(timing, &mut rng, signal)),
        PuzzleKind::Slide => {
            ActivePuzzle::Slide(SlidePuzzle::new(timing, &config.tuning, &mut rng, signal))
        }
        PuzzleKind::Memory => ActivePuzzle::Memory(MemoryPuzzle::new(
            timing,
            config.tuning.memory_rounds,
            &mut rng,
            signal,
        )),
        PuzzleKind::Lock => ActivePuzzle::Lock(LockPuzzle::new(timing, signal)),
        PuzzleKind::Word => ActivePuzzle::Word(WordPuzzle::new(timing, &mut rng, signal)),
    };

    world.level_index = level_idx;
    world.puzzle = Some(puzzle);
    world.watcher = Some(watcher);
    world.phase = Phase::Playing;
    world.anim_tick = 0;
}
