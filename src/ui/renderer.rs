/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (a flat array of Cell)
///   2. Compare each cell with `back` (the previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Copy front → back
///
/// This eliminates flicker caused by full-screen redraws. Cells hold a
/// single `char`: the whole UI sticks to ASCII plus narrow box-drawing
/// glyphs, so no wide-character bookkeeping is needed.

use std::io::{self, stdout, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::tile::{PipeKind, PipeTile, Side};
use crate::puzzle::lock::{LockPuzzle, OPTION_NAMES, RING_COUNT, TARGET};
use crate::puzzle::memory::{MemoryPuzzle, MemoryState, PAD_COUNT, PAD_NAMES};
use crate::puzzle::path::PathPuzzle;
use crate::puzzle::slide::{SlidePuzzle, GAP, SLIDE_SIZE};
use crate::puzzle::word::{WordFocus, WordPuzzle};
use crate::sim::level::{PuzzleKind, FINAL_LINE, LEVELS};
use crate::sim::world::{ActivePuzzle, Phase, WorldState};

// ── Palette ──

const BASE_BG: Color = Color::Rgb { r: 28, g: 26, b: 24 };
const PANEL: Color = Color::Rgb { r: 44, g: 40, b: 37 };
const TEXT: Color = Color::Rgb { r: 214, g: 211, b: 205 };
const DIM: Color = Color::Rgb { r: 128, g: 120, b: 112 };
const FAINT: Color = Color::Rgb { r: 78, g: 72, b: 66 };
const AMBER: Color = Color::Rgb { r: 251, g: 191, b: 36 };
const ROSE: Color = Color::Rgb { r: 251, g: 113, b: 133 };
const LIT_BG: Color = Color::Rgb { r: 116, g: 84, b: 18 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: TEXT, bg: BASE_BG };

    /// Sentinel that differs from any real cell, so every position is
    /// re-emitted after a resize.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };
}

pub struct Renderer {
    out: BufWriter<Stdout>,
    width: usize,
    height: usize,
    front: Vec<Cell>,
    back: Vec<Cell>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(stdout()),
            width: 0,
            height: 0,
            front: vec![],
            back: vec![],
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    // ── Frame lifecycle ──

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        let (w, h) = terminal::size()?;
        let (w, h) = (w as usize, h.max(4) as usize);
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.front = vec![Cell::BLANK; w * h];
            self.back = vec![Cell::INVALID; w * h];
            queue!(self.out, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
        }
        self.front.fill(Cell::BLANK);

        match world.phase {
            Phase::Intro => self.draw_intro(world),
            Phase::Playing => self.draw_playing(world),
            Phase::LevelComplete => self.draw_level_complete(world),
            Phase::GameComplete => self.draw_game_complete(world),
        }

        self.flush_diff()
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut fg = Color::Reset;
        let mut bg = Color::Reset;
        for idx in 0..self.front.len() {
            let cell = self.front[idx];
            if cell == self.back[idx] {
                continue;
            }
            let x = (idx % self.width) as u16;
            let y = (idx / self.width) as u16;
            queue!(self.out, MoveTo(x, y))?;
            if cell.fg != fg {
                queue!(self.out, SetForegroundColor(cell.fg))?;
                fg = cell.fg;
            }
            if cell.bg != bg {
                queue!(self.out, SetBackgroundColor(cell.bg))?;
                bg = cell.bg;
            }
            queue!(self.out, Print(cell.ch))?;
            self.back[idx] = cell;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    // ── Drawing primitives ──

    fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        self.front[y * self.width + x] = Cell { ch, fg, bg };
    }

    fn text(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i as i32, y, ch, fg, bg);
        }
    }

    fn centered(&mut self, y: i32, s: &str, fg: Color, bg: Color) {
        let x = (self.width as i32 - s.chars().count() as i32) / 2;
        self.text(x, y, s, fg, bg);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, bg: Color) {
        for dy in 0..h {
            for dx in 0..w {
                self.put(x + dx, y + dy, ' ', TEXT, bg);
            }
        }
    }

    // ── Screens ──

    fn draw_intro(&mut self, world: &WorldState) {
        let mid = self.height as i32 / 2;
        self.centered(mid - 5, "P U Z Z L E   B O X", TEXT, BASE_BG);
        self.centered(mid - 3, "────────", ROSE, BASE_BG);
        self.centered(
            mid - 1,
            "A little journey to collect the missing pieces.",
            DIM,
            BASE_BG,
        );
        // Slow blink on the prompt, driven by the idle tick.
        let prompt = if (world.anim_tick / 12) % 2 == 0 { TEXT } else { DIM };
        self.centered(mid + 3, "[ enter ] begin      [ q ] quit", prompt, BASE_BG);
    }

    fn draw_playing(&mut self, world: &WorldState) {
        let level = world.current_level();
        self.centered(
            1,
            &format!("P U Z Z L E  {} / {}", level.id, LEVELS.len()),
            FAINT,
            BASE_BG,
        );
        self.centered(2, level.title, TEXT, BASE_BG);
        self.centered(3, level.instruction, DIM, BASE_BG);

        if let Some(puzzle) = &world.puzzle {
            match puzzle {
                ActivePuzzle::Path(p) => self.draw_path(p),
                ActivePuzzle::Slide(p) => self.draw_slide(p),
                ActivePuzzle::Memory(p) => self.draw_memory(p),
                ActivePuzzle::Lock(p) => self.draw_lock(p),
                ActivePuzzle::Word(p) => self.draw_word(p),
            }
            let hints = match level.kind {
                PuzzleKind::Path => "[arrows] select   [enter] rotate   [r] redeal   [esc] menu",
                PuzzleKind::Slide => "[arrows] select   [enter] slide   [r] redeal   [esc] menu",
                PuzzleKind::Memory => "[1-4] pads   [r] redeal   [esc] menu",
                PuzzleKind::Lock => "[left/right] ring   [up/down] turn   [esc] menu",
                PuzzleKind::Word => "[arrows] select   [enter] place/return   [esc] menu",
            };
            let y = self.height as i32 - 2;
            self.centered(y, hints, FAINT, BASE_BG);
        }
    }

    fn draw_level_complete(&mut self, world: &WorldState) {
        let level = world.current_level();
        let mid = self.height as i32 / 2;
        self.centered(mid - 4, "· a piece falls into place ·", ROSE, BASE_BG);

        let width = (self.width.saturating_sub(10)).clamp(24, 56);
        let lines = wrap(&format!("\u{201c}{}\u{201d}", level.reward), width);
        for (i, line) in lines.iter().enumerate() {
            self.centered(mid - 1 + i as i32, line, TEXT, BASE_BG);
        }

        let last = world.level_index + 1 >= LEVELS.len();
        let prompt = if last {
            "[ enter ] finish"
        } else {
            "[ enter ] collect the piece"
        };
        self.centered(mid + 2 + lines.len() as i32, prompt, DIM, BASE_BG);
    }

    fn draw_game_complete(&mut self, world: &WorldState) {
        let mid = self.height as i32 / 2;
        let glow = if (world.anim_tick / 8) % 2 == 0 { ROSE } else { AMBER };
        self.centered(mid - 5, "♥", glow, BASE_BG);
        self.centered(mid - 3, "C o m p l e t e d", TEXT, BASE_BG);

        let width = (self.width.saturating_sub(10)).clamp(24, 60);
        let lines = wrap(&format!("\u{201c}{FINAL_LINE}\u{201d}"), width);
        for (i, line) in lines.iter().enumerate() {
            self.centered(mid + i as i32, line, DIM, BASE_BG);
        }
        self.centered(
            mid + 3 + lines.len() as i32,
            "[ enter ] back to the beginning",
            FAINT,
            BASE_BG,
        );
    }

    // ── Puzzle views ──

    fn draw_path(&mut self, p: &PathPuzzle) {
        let size = p.grid.size() as i32;
        let cell_w = 6;
        let cell_h = 3;
        let ox = (self.width as i32 - size * cell_w) / 2;
        let oy = 5;

        for y in 0..size {
            for x in 0..size {
                let tile = p.grid.tile(x as usize, y as usize);
                let cx = ox + x * cell_w;
                let cy = oy + y * cell_h;
                self.fill_rect(cx, cy, cell_w - 1, cell_h - 1, PANEL);

                let fg = if tile.connected {
                    AMBER
                } else if tile.fixed {
                    ROSE
                } else {
                    DIM
                };
                self.put(cx + 2, cy + 1, tile_glyph(tile), fg, PANEL);

                if p.cursor == (x as usize, y as usize) {
                    let accent = if p.solved { AMBER } else { TEXT };
                    self.put(cx, cy + 1, '[', accent, PANEL);
                    self.put(cx + cell_w - 2, cy + 1, ']', accent, PANEL);
                }
            }
        }

        if p.solved {
            self.centered(oy + size * cell_h + 1, "the path holds", AMBER, BASE_BG);
        }
    }

    fn draw_slide(&mut self, p: &SlidePuzzle) {
        let size = SLIDE_SIZE as i32;
        let cell_w = 7;
        let cell_h = 3;
        let ox = (self.width as i32 - size * cell_w) / 2;
        let oy = 5;

        for (idx, &value) in p.cells.iter().enumerate() {
            let x = (idx % SLIDE_SIZE) as i32;
            let y = (idx / SLIDE_SIZE) as i32;
            let cx = ox + x * cell_w;
            let cy = oy + y * cell_h;

            if value == GAP && !p.solved {
                // The gap: bare background, selectable but inert.
            } else {
                self.fill_rect(cx, cy, cell_w - 1, cell_h - 1, PANEL);
                let fg = if p.solved { AMBER } else { TEXT };
                let label = (b'1' + value) as char;
                self.put(cx + 2, cy + 1, label, fg, PANEL);
            }

            if p.cursor == idx && !p.solved {
                self.put(cx, cy + 1, '[', TEXT, PANEL);
                self.put(cx + cell_w - 2, cy + 1, ']', TEXT, PANEL);
            }
        }

        if p.solved {
            self.centered(oy + size * cell_h + 1, "the picture is whole", AMBER, BASE_BG);
        }
    }

    fn draw_memory(&mut self, p: &MemoryPuzzle) {
        let pad_w = 14;
        let pad_h = 3;
        let ox = (self.width as i32 - 2 * pad_w - 2) / 2;
        let oy = 5;

        for pad in 0..PAD_COUNT {
            let x = ox + (pad as i32 % 2) * (pad_w + 2);
            let y = oy + (pad as i32 / 2) * (pad_h + 1);
            let lit = p.lit == Some(pad);
            let bg = if lit { LIT_BG } else { PANEL };
            let fg = if lit { TEXT } else { DIM };
            self.fill_rect(x, y, pad_w, pad_h, bg);
            let label = format!("{}  {}", pad + 1, PAD_NAMES[pad]);
            let lx = x + (pad_w - label.chars().count() as i32) / 2;
            self.text(lx, y + 1, &label, fg, bg);
        }

        let below = oy + 2 * (pad_h + 1) + 1;
        self.centered(
            below,
            &format!("pattern {} / {}", p.round, p.rounds),
            DIM,
            BASE_BG,
        );
        let status = match p.state {
            MemoryState::RoundPause => "get ready...",
            MemoryState::Playback => "watch the pattern...",
            MemoryState::Awaiting => "your turn - repeat it",
            MemoryState::MismatchPause => "not quite - watch again",
            MemoryState::Solved => "perfect!",
        };
        let fg = if p.state == MemoryState::Solved { AMBER } else { TEXT };
        self.centered(below + 1, status, fg, BASE_BG);
    }

    fn draw_lock(&mut self, p: &LockPuzzle) {
        let ring_w = 9;
        let ox = (self.width as i32 - RING_COUNT as i32 * (ring_w + 2)) / 2;
        let oy = 6;

        for ring in 0..RING_COUNT {
            let x = ox + ring as i32 * (ring_w + 2);
            let selected = p.cursor == ring && !p.solved;
            let accent = if selected { AMBER } else { FAINT };

            self.put(x + ring_w / 2, oy, '^', accent, BASE_BG);
            self.fill_rect(x, oy + 1, ring_w, 3, PANEL);
            let name = OPTION_NAMES[p.rings[ring]];
            let lx = x + (ring_w - name.chars().count() as i32) / 2;
            let fg = if p.solved { AMBER } else { TEXT };
            self.text(lx, oy + 2, name, fg, PANEL);
            self.put(x + ring_w / 2, oy + 4, 'v', accent, BASE_BG);

            if selected {
                self.put(x, oy + 2, '[', AMBER, PANEL);
                self.put(x + ring_w - 1, oy + 2, ']', AMBER, PANEL);
            }
        }

        // Subtle hint, the way the lockbox etches its own key.
        let hint = format!(
            "key: {} · {} · {}",
            OPTION_NAMES[TARGET[0]],
            OPTION_NAMES[TARGET[1]],
            OPTION_NAMES[TARGET[2]]
        );
        self.centered(oy + 7, &hint, FAINT, BASE_BG);
        let status = if p.solved { "it opens" } else { "match the key" };
        let fg = if p.solved { AMBER } else { DIM };
        self.centered(oy + 9, status, fg, BASE_BG);
    }

    fn draw_word(&mut self, p: &WordPuzzle) {
        let oy = 6;

        // Slots row: fixed-width boxes, filled ones show their word.
        let slot_w = 9i32;
        let total = p.slots.len() as i32 * (slot_w + 1);
        let ox = (self.width as i32 - total) / 2;
        for (i, slot) in p.slots.iter().enumerate() {
            let x = ox + i as i32 * (slot_w + 1);
            self.fill_rect(x, oy, slot_w, 1, PANEL);
            match slot {
                Some(frag) => {
                    let lx = x + (slot_w - frag.text.chars().count() as i32) / 2;
                    self.text(lx, oy, frag.text, AMBER, PANEL);
                }
                None => {
                    self.text(x + 2, oy, "·····", FAINT, PANEL);
                }
            }
            if p.focus == WordFocus::Slots && p.slot_cursor == i && !p.solved {
                self.put(x, oy, '[', TEXT, PANEL);
                self.put(x + slot_w - 1, oy, ']', TEXT, PANEL);
            }
        }

        // Pool: remaining fragments laid out on one line.
        let pool_y = oy + 4;
        let pool_width: i32 = p
            .pool
            .iter()
            .map(|f| f.text.chars().count() as i32 + 3)
            .sum();
        let mut x = (self.width as i32 - pool_width) / 2;
        for (i, frag) in p.pool.iter().enumerate() {
            let selected = p.focus == WordFocus::Pool && p.pool_cursor == i;
            let (l, r) = if selected { ('[', ']') } else { (' ', ' ') };
            let fg = if selected { TEXT } else { DIM };
            self.put(x, pool_y, l, TEXT, BASE_BG);
            self.text(x + 1, pool_y, frag.text, fg, BASE_BG);
            self.put(x + 1 + frag.text.chars().count() as i32, pool_y, r, TEXT, BASE_BG);
            x += frag.text.chars().count() as i32 + 3;
        }

        if p.solved {
            self.centered(pool_y + 3, "the message is whole", AMBER, BASE_BG);
        } else {
            let focus = match p.focus {
                WordFocus::Pool => "picking from the pool",
                WordFocus::Slots => "returning from the slots",
            };
            self.centered(pool_y + 3, focus, FAINT, BASE_BG);
        }
    }
}

/// Glyph for a pipe tile at its current rotation, derived from the
/// sides it opens on.
fn tile_glyph(tile: &PipeTile) -> char {
    match tile.kind {
        PipeKind::Start => 'S',
        PipeKind::End => 'E',
        _ => {
            let mut mask = 0u8;
            for side in Side::ALL {
                if tile.opens_on(side) {
                    mask |= 1 << side.index();
                }
            }
            match mask {
                0b0101 => '─',
                0b1010 => '│',
                0b0011 => '┌',
                0b0110 => '┐',
                0b1100 => '┘',
                0b1001 => '└',
                _ => '·',
            }
        }
    }
}

/// Greedy word wrap, for reward and finale lines.
fn wrap(s: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut line = String::new();
    for word in s.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
