/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// All durations are in simulation ticks; one tick lasts `tick_rate_ms`.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub tuning: PuzzleTuning,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    /// Rotation → solver re-evaluation delay. Rapid rotations coalesce:
    /// each rotation restarts this countdown.
    pub solver_debounce: u32,
    /// Win predicate → completion callback, for path, memory, and lock.
    pub solve_pause: u32,
    /// The slide puzzle lingers a little longer on its finished picture.
    pub slide_solve_pause: u32,
    /// Playback tempo: one sequence symbol per this many ticks.
    pub playback_step: u32,
    /// How long a pad stays lit during playback.
    pub playback_flash: u32,
    /// Pause before the first round and between rounds.
    pub round_pause: u32,
    /// Mismatch feedback window before the sequence replays.
    pub mismatch_pause: u32,
    /// Suspense between the last fragment landing and the verdict.
    pub word_check: u32,
}

#[derive(Clone, Debug)]
pub struct PuzzleTuning {
    /// Legal random moves applied to shuffle the slide puzzle.
    pub shuffle_moves: u32,
    /// Sequence length the memory puzzle grows to.
    pub memory_rounds: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    puzzle: TomlPuzzle,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_solver_debounce")]
    solver_debounce: u32,
    #[serde(default = "default_solve_pause")]
    solve_pause: u32,
    #[serde(default = "default_slide_solve_pause")]
    slide_solve_pause: u32,
    #[serde(default = "default_playback_step")]
    playback_step: u32,
    #[serde(default = "default_playback_flash")]
    playback_flash: u32,
    #[serde(default = "default_round_pause")]
    round_pause: u32,
    #[serde(default = "default_mismatch_pause")]
    mismatch_pause: u32,
    #[serde(default = "default_word_check")]
    word_check: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPuzzle {
    #[serde(default = "default_shuffle_moves")]
    shuffle_moves: u32,
    #[serde(default = "default_memory_rounds")]
    memory_rounds: usize,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_solver_debounce() -> u32 { 2 }    // 100ms after the last rotation
fn default_solve_pause() -> u32 { 20 }       // 1s of visual feedback
fn default_slide_solve_pause() -> u32 { 24 } // 1.2s on the whole picture
fn default_playback_step() -> u32 { 16 }     // one symbol per 800ms
fn default_playback_flash() -> u32 { 8 }     // lit for 400ms of each step
fn default_round_pause() -> u32 { 20 }
fn default_mismatch_pause() -> u32 { 12 }
fn default_word_check() -> u32 { 10 }        // 500ms of suspense

fn default_shuffle_moves() -> u32 { 20 }
fn default_memory_rounds() -> usize { 4 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            solver_debounce: default_solver_debounce(),
            solve_pause: default_solve_pause(),
            slide_solve_pause: default_slide_solve_pause(),
            playback_step: default_playback_step(),
            playback_flash: default_playback_flash(),
            round_pause: default_round_pause(),
            mismatch_pause: default_mismatch_pause(),
            word_check: default_word_check(),
        }
    }
}

impl Default for TomlPuzzle {
    fn default() -> Self {
        TomlPuzzle {
            shuffle_moves: default_shuffle_moves(),
            memory_rounds: default_memory_rounds(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms.max(1),
                solver_debounce: toml_cfg.timing.solver_debounce,
                solve_pause: toml_cfg.timing.solve_pause,
                slide_solve_pause: toml_cfg.timing.slide_solve_pause,
                playback_step: toml_cfg.timing.playback_step.max(1),
                playback_flash: toml_cfg.timing.playback_flash,
                round_pause: toml_cfg.timing.round_pause,
                mismatch_pause: toml_cfg.timing.mismatch_pause,
                word_check: toml_cfg.timing.word_check,
            },
            tuning: PuzzleTuning {
                shuffle_moves: toml_cfg.puzzle.shuffle_moves,
                memory_rounds: toml_cfg.puzzle.memory_rounds.max(1),
            },
        }
    }
}

#[cfg(test)]
impl GameConfig {
    /// Defaults without touching the filesystem, for tests.
    pub fn default_for_tests() -> Self {
        GameConfig {
            timing: TimingConfig {
                tick_rate_ms: default_tick_rate(),
                solver_debounce: default_solver_debounce(),
                solve_pause: default_solve_pause(),
                slide_solve_pause: default_slide_solve_pause(),
                playback_step: default_playback_step(),
                playback_flash: default_playback_flash(),
                round_pause: default_round_pause(),
                mismatch_pause: default_mismatch_pause(),
                word_check: default_word_check(),
            },
            tuning: PuzzleTuning {
                shuffle_moves: default_shuffle_moves(),
                memory_rounds: default_memory_rounds(),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
