/// Entry point and game loop.

mod config;
mod domain;
mod puzzle;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use puzzle::{PuzzleEvent, PuzzleMove};
use sim::level::load_level;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    let mut world = WorldState::new();

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Puzzle Box.");
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        let was_playing = world.phase == Phase::Playing;
        if handle_meta(world, sound, &kb, config) {
            break;
        }

        // Player moves are applied synchronously, in arrival order, so
        // no two of them ever interleave mid-update. The phase guard
        // keeps the keystroke that mounted a puzzle from leaking into it.
        if was_playing && world.phase == Phase::Playing {
            let moves: Vec<PuzzleMove> =
                kb.pressed().filter_map(|k| decode_move(k.code)).collect();
            for mv in moves {
                let events = step::apply_move(world, mv);
                process_sound_events(sound, &events);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::tick(world);
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Translate one key into a puzzle move. WASD mirrors the arrows.
fn decode_move(code: KeyCode) -> Option<PuzzleMove> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(PuzzleMove::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(PuzzleMove::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(PuzzleMove::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(PuzzleMove::Right),
        KeyCode::Enter | KeyCode::Char(' ') => Some(PuzzleMove::Confirm),
        KeyCode::Char(c @ '1'..='4') => Some(PuzzleMove::Pad(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Phase transitions driven by meta keys. Returns true to quit.
fn handle_meta(
    world: &mut WorldState,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    config: &GameConfig,
) -> bool {
    let confirm = kb.any_pressed(KEYS_CONFIRM);
    let esc = kb.was_pressed(KeyCode::Esc);

    match world.phase {
        // ── Intro ──
        Phase::Intro => {
            if confirm {
                play(sound, SoundEngine::play_click);
                load_level(world, 0, config);
            } else if esc || kb.any_pressed(KEYS_QUIT) {
                return true;
            }
        }

        // ── Playing ──
        Phase::Playing => {
            if esc {
                // Unmounting drops the puzzle's pending countdowns too.
                world.return_to_intro();
            } else if kb.any_pressed(KEYS_RESTART) {
                // Fresh deal of the same level. Doubles as the way out
                // of a path grid that happened to deal unsolvable.
                play(sound, SoundEngine::play_click);
                load_level(world, world.level_index, config);
            }
        }

        // ── Level Complete (reward screen) ──
        Phase::LevelComplete => {
            if confirm {
                let next = world.level_index + 1;
                load_level(world, next, config);
                if world.phase == Phase::GameComplete {
                    play(sound, SoundEngine::play_win);
                } else {
                    play(sound, SoundEngine::play_click);
                }
            }
        }

        // ── Game Complete ──
        Phase::GameComplete => {
            if confirm || esc {
                play(sound, SoundEngine::play_click);
                world.return_to_intro();
            }
        }
    }

    false
}

fn play(sound: Option<&SoundEngine>, cue: fn(&SoundEngine)) {
    if let Some(sfx) = sound {
        cue(sfx);
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[PuzzleEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            PuzzleEvent::TileRotated
            | PuzzleEvent::PlaybackStep(_)
            | PuzzleEvent::FragmentPlaced => sfx.play_click(),
            PuzzleEvent::TileSlid | PuzzleEvent::FragmentReturned => sfx.play_slide(),
            PuzzleEvent::RingTurned
            | PuzzleEvent::SequenceMismatch
            | PuzzleEvent::OrderMismatch => sfx.play_lock(),
            PuzzleEvent::PadPressed(_) => sfx.play_correct(),
            PuzzleEvent::Unlocked => sfx.play_win(),
            // The solve latch itself is silent; the reward screen's
            // arrival carries the chime.
            PuzzleEvent::PuzzleSolved => {}
            PuzzleEvent::LevelFinished => sfx.play_correct(),
        }
    }
}
