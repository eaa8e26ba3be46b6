/// WorldState: the host side of the game.
///
/// The host owns exactly four phases and sequences the five mini-games
/// through them. Each mini-game is an isolated state machine that talks
/// back through its completion watcher only; the host never reaches
/// into puzzle internals except to render them.

use crate::puzzle::completion::CompletionWatcher;
use crate::puzzle::lock::LockPuzzle;
use crate::puzzle::memory::MemoryPuzzle;
use crate::puzzle::path::PathPuzzle;
use crate::puzzle::slide::SlidePuzzle;
use crate::puzzle::word::WordPuzzle;
use crate::puzzle::PuzzleEvent;
use crate::sim::level::{LevelDef, LEVELS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Intro,
    Playing,
    LevelComplete,
    GameComplete,
}

/// The currently mounted mini-game.
pub enum ActivePuzzle {
    Path(PathPuzzle),
    Slide(SlidePuzzle),
    Memory(MemoryPuzzle),
    Lock(LockPuzzle),
    Word(WordPuzzle),
}

impl ActivePuzzle {
    pub fn tick(&mut self) -> Vec<PuzzleEvent> {
        match self {
            ActivePuzzle::Path(p) => p.tick(),
            ActivePuzzle::Slide(p) => p.tick(),
            ActivePuzzle::Memory(p) => p.tick(),
            ActivePuzzle::Lock(p) => p.tick(),
            ActivePuzzle::Word(p) => p.tick(),
        }
    }
}

pub struct WorldState {
    pub phase: Phase,
    pub level_index: usize,
    /// Mounted mini-game; `None` outside the playing phase. Dropping it
    /// cancels every countdown the puzzle had pending.
    pub puzzle: Option<ActivePuzzle>,
    /// Host half of the mounted puzzle's completion channel.
    pub watcher: Option<CompletionWatcher>,
    /// Free-running counter for idle animation.
    pub anim_tick: u32,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            phase: Phase::Intro,
            level_index: 0,
            puzzle: None,
            watcher: None,
            anim_tick: 0,
        }
    }

    pub fn current_level(&self) -> &'static LevelDef {
        &LEVELS[self.level_index.min(LEVELS.len() - 1)]
    }

    /// Tear down whatever is mounted and go back to the intro screen.
    /// Unmounting drops the puzzle and its pending timers with it.
    pub fn return_to_intro(&mut self) {
        self.puzzle = None;
        self.watcher = None;
        self.level_index = 0;
        self.phase = Phase::Intro;
        self.anim_tick = 0;
    }
}
