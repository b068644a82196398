//! Terminal backend — all terminal output lives here.
//!
//! Logical coordinates are scaled onto the current terminal grid every
//! frame, so resizing the terminal just rescales the playfield.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use super::{Canvas, Sprite};
use crate::config::GameConfig;

/// Fonts at or above this size are drawn bold.
const LARGE_FONT: u16 = 48;

const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;

// Two-row, three-column glyphs:
//   ▲       «▼»
//  /█\      ╚═╝
const PLAYER_GLYPH: [&str; 2] = [" ▲ ", "/█\\"];
const ENEMY_GLYPH: [&str; 2] = ["«▼»", "╚═╝"];

pub struct TerminalCanvas<W: Write> {
    out: W,
    logical_width: i32,
    logical_height: i32,
    player_size: i32,
    enemy_size: i32,
    cols: u16,
    rows: u16,
    active: bool,
}

impl<W: Write> TerminalCanvas<W> {
    /// The "create window" step: raw mode, alternate screen, hidden cursor
    /// and the window title.  If any step after raw mode fails, the
    /// half-built canvas is dropped and the terminal restored.
    pub fn open(out: W, config: &GameConfig) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut canvas = Self::detached(out, config);
        canvas.enter(&config.title)?;
        Ok(canvas)
    }

    /// A canvas that owns the terminal but has not set up the screen yet.
    fn detached(out: W, config: &GameConfig) -> Self {
        Self {
            out,
            logical_width: config.screen_width,
            logical_height: config.screen_height,
            player_size: config.player_size,
            enemy_size: config.enemy_size,
            cols: 0,
            rows: 0,
            active: true,
        }
    }

    fn enter(&mut self, title: &str) -> std::io::Result<()> {
        self.out.execute(terminal::EnterAlternateScreen)?;
        self.out.execute(cursor::Hide)?;
        self.out.execute(terminal::SetTitle(title))?;
        (self.cols, self.rows) = terminal::size()?;
        Ok(())
    }

    /// Give the terminal back.  Safe to call more than once.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let _ = self.out.execute(style::ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    fn col(&self, x: i32) -> u16 {
        scale(x, self.logical_width, self.cols)
    }

    fn row(&self, y: i32) -> u16 {
        scale(y, self.logical_height, self.rows)
    }

    fn visible(&self, y: i32) -> bool {
        y >= 0 && y < self.logical_height
    }
}

/// Map a logical coordinate onto `cells` cells, clamped to the grid.
pub fn scale(v: i32, logical: i32, cells: u16) -> u16 {
    if cells == 0 || logical <= 0 {
        return 0;
    }
    let cell = i64::from(v) * i64::from(cells) / i64::from(logical);
    cell.clamp(0, i64::from(cells) - 1) as u16
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self, color: Color) -> std::io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        self.out.queue(style::SetBackgroundColor(color))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: Sprite, x: i32, y: i32) -> std::io::Result<()> {
        let (glyph, color, size) = match sprite {
            Sprite::Player => (PLAYER_GLYPH, C_PLAYER, self.player_size),
            Sprite::Enemy => (ENEMY_GLYPH, C_ENEMY, self.enemy_size),
        };
        if !self.visible(y) {
            return Ok(());
        }

        // Centre the glyph on the sprite's box.
        let lx = self.col(x + size / 2).saturating_sub(1);
        let lx = lx.min(self.cols.saturating_sub(3));
        let top = self.row(y);

        self.out.queue(style::SetForegroundColor(color))?;
        for (i, line) in glyph.iter().enumerate() {
            let r = top + i as u16;
            if r >= self.rows {
                break;
            }
            self.out.queue(cursor::MoveTo(lx, r))?;
            self.out.queue(Print(*line))?;
        }
        Ok(())
    }

    fn draw_filled_rect(&mut self, color: Color, x: i32, y: i32, w: i32, h: i32) -> std::io::Result<()> {
        if w <= 0 || h <= 0 || (!self.visible(y) && !self.visible(y + h - 1)) {
            return Ok(());
        }
        let (c0, c1) = (self.col(x), self.col(x + w - 1));
        let (r0, r1) = (self.row(y), self.row(y + h - 1));

        self.out.queue(style::SetForegroundColor(color))?;
        let fill = "█".repeat(usize::from(c1 - c0) + 1);
        for r in r0..=r1 {
            self.out.queue(cursor::MoveTo(c0, r))?;
            self.out.queue(Print(&fill))?;
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, font_size: u16, color: Color, cx: i32, cy: i32) -> std::io::Result<()> {
        let width = text.chars().count() as u16;
        let col = self
            .col(cx)
            .saturating_sub(width / 2)
            .min(self.cols.saturating_sub(width));

        self.out.queue(cursor::MoveTo(col, self.row(cy)))?;
        self.out.queue(style::SetForegroundColor(color))?;
        if font_size >= LARGE_FONT {
            self.out.queue(style::SetAttribute(Attribute::Bold))?;
            self.out.queue(Print(text))?;
            self.out.queue(style::SetAttribute(Attribute::Reset))?;
        } else {
            self.out.queue(Print(text))?;
        }
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalCanvas<W> {
    fn drop(&mut self) {
        self.restore();
    }
}
