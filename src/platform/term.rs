//! Crossterm terminal frontend
//!
//! Rasterizes the playfield onto the terminal cell grid with a full
//! redraw per frame. Input is snapshotted from the event queue; held
//! keys use a release timeout so terminals that never emit key-release
//! events still stop the paddle shortly after the key is let go.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use glam::Vec2;

use super::{Clock, FrameInput, InputSource, Surface};
use crate::Color;
use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::sim::Rect;

/// How long a held key stays "down" after its last press event
const KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(150);

/// Monotonic wall clock
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// One terminal cell: a glyph over a background color
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// Cell-buffer surface over crossterm.
///
/// Game coordinates scale to the terminal size captured at startup.
/// Construction enters raw mode and the alternate screen; the terminal
/// is restored on drop (or an explicit `exit`).
pub struct TermSurface {
    stdout: io::Stdout,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    buf: Vec<u8>,
    entered: bool,
}

impl TermSurface {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut surface = Self {
            stdout: io::stdout(),
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
            buf: Vec::with_capacity(64 * 1024),
            entered: false,
        };
        surface.enter()?;
        Ok(surface)
    }

    fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        self.buf.clear();
        Ok(())
    }

    #[inline]
    fn col_of(&self, x: f32) -> i32 {
        (x / WINDOW_WIDTH * self.cols as f32).floor() as i32
    }

    #[inline]
    fn row_of(&self, y: f32) -> i32 {
        (y / WINDOW_HEIGHT * self.rows as f32).floor() as i32
    }

    fn put(&mut self, col: i32, row: i32, ch: Option<char>, fg: Option<Color>, bg: Option<Color>) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let cell = &mut self.cells[row as usize * self.cols as usize + col as usize];
        if let Some(ch) = ch {
            cell.ch = ch;
        }
        if let Some(fg) = fg {
            cell.fg = fg;
        }
        if let Some(bg) = bg {
            cell.bg = bg;
        }
    }
}

impl Surface for TermSurface {
    fn clear(&mut self, color: Color) {
        for cell in &mut self.cells {
            *cell = Cell {
                ch: ' ',
                fg: Color::WHITE,
                bg: color,
            };
        }
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        let col0 = self.col_of(rect.x);
        let row0 = self.row_of(rect.y);
        // At least one cell, even for bars thinner than a cell
        let col1 = ((rect.right() / WINDOW_WIDTH * self.cols as f32).ceil() as i32).max(col0 + 1);
        let row1 = ((rect.bottom() / WINDOW_HEIGHT * self.rows as f32).ceil() as i32).max(row0 + 1);

        for row in row0..row1 {
            for col in col0..col1 {
                self.put(col, row, Some(' '), None, Some(color));
            }
        }
    }

    fn draw_circle(&mut self, center: Vec2, _radius: f32, color: Color) {
        self.put(
            self.col_of(center.x),
            self.row_of(center.y),
            Some('\u{2022}'),
            Some(color),
            None,
        );
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, color: Color) {
        let row = self.row_of(pos.y);
        let col0 = self.col_of(pos.x);
        for (i, ch) in text.chars().enumerate() {
            self.put(col0 + i as i32, row, Some(ch), Some(color), None);
        }
    }

    fn present(&mut self) -> Result<()> {
        self.buf.queue(cursor::MoveTo(0, 0))?;

        let mut fg: Option<Color> = None;
        let mut bg: Option<Color> = None;
        for row in 0..self.rows as usize {
            for col in 0..self.cols as usize {
                let cell = self.cells[row * self.cols as usize + col];
                if fg != Some(cell.fg) {
                    self.buf.queue(SetForegroundColor(term_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    self.buf.queue(SetBackgroundColor(term_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                self.buf.queue(Print(cell.ch))?;
            }
            if row + 1 < self.rows as usize {
                self.buf.queue(Print("\r\n"))?;
            }
        }
        self.buf.queue(ResetColor)?;

        self.flush_buf()
    }
}

impl Drop for TermSurface {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Input source over the crossterm event queue
#[derive(Debug, Default)]
pub struct TermInput {
    left_until: Option<Instant>,
    right_until: Option<Instant>,
}

impl TermInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_key(&mut self, key: KeyEvent, frame: &mut FrameInput) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => frame.quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    frame.quit = true;
                }
                KeyCode::Char(' ') => frame.launch_pressed = true,
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                    self.left_until = Some(Instant::now() + KEY_RELEASE_TIMEOUT);
                }
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.right_until = Some(Instant::now() + KEY_RELEASE_TIMEOUT);
                }
                _ => {}
            },
            KeyEventKind::Release => match key.code {
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                    self.left_until = None;
                }
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.right_until = None;
                }
                _ => {}
            },
        }
    }
}

impl InputSource for TermInput {
    /// Drain the event queue, blocking up to `wait` in total. The wait
    /// is the session's frame pacing, so this returns close to the
    /// frame deadline whether or not events arrived.
    fn poll(&mut self, wait: Duration) -> Result<FrameInput> {
        let mut frame = FrameInput::default();
        let deadline = Instant::now() + wait;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, &mut frame);
            }
        }

        let now = Instant::now();
        frame.left_held = self.left_until.is_some_and(|t| now < t);
        frame.right_held = self.right_until.is_some_and(|t| now < t);
        Ok(frame)
    }
}
