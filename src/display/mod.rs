//! Rendering layer.
//!
//! `render` translates game state into calls on a `Canvas`; no game logic is
//! performed here.  Coordinates are logical pixels (800×600 by default),
//! backends map them onto whatever surface they own.

pub mod terminal;

use crossterm::style::Color;

use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_TEXT: Color = Color::White;
const C_BULLET: Color = Color::White;

const BANNER_FONT: u16 = 72;
const HUD_FONT: u16 = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Enemy,
}

/// Primitive drawing capabilities the game needs from a backend.
pub trait Canvas {
    fn clear(&mut self, color: Color) -> std::io::Result<()>;
    /// Draw `sprite` with its top-left corner at `(x, y)`.
    fn draw_sprite(&mut self, sprite: Sprite, x: i32, y: i32) -> std::io::Result<()>;
    fn draw_filled_rect(&mut self, color: Color, x: i32, y: i32, w: i32, h: i32)
        -> std::io::Result<()>;
    /// Draw `text` centred on `(cx, cy)`.
    fn draw_text(&mut self, text: &str, font_size: u16, color: Color, cx: i32, cy: i32)
        -> std::io::Result<()>;
    fn present(&mut self) -> std::io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig) -> std::io::Result<()> {
    canvas.clear(C_BACKGROUND)?;

    match state.status {
        GameStatus::Paused => draw_banner(canvas, "PAUSED", config)?,
        GameStatus::GameOver => draw_banner(canvas, "GAME OVER", config)?,
        GameStatus::Running => {
            canvas.draw_sprite(Sprite::Player, state.player.x, state.player.y)?;
            for enemy in &state.enemies {
                canvas.draw_sprite(Sprite::Enemy, enemy.x, enemy.y)?;
            }
            for bullet in &state.bullets {
                canvas.draw_filled_rect(
                    C_BULLET,
                    bullet.x,
                    bullet.y,
                    config.bullet_size,
                    config.bullet_size,
                )?;
            }
            draw_hud(canvas, state, config)?;
        }
    }

    canvas.present()
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig) -> std::io::Result<()> {
    canvas.draw_text(&format!("Score: {}", state.score), HUD_FONT, C_TEXT, 70, 10)?;
    canvas.draw_text(
        &format!("High Score: {}", state.high_score),
        HUD_FONT,
        C_TEXT,
        config.screen_width - 150,
        10,
    )
}

fn draw_banner<C: Canvas>(canvas: &mut C, text: &str, config: &GameConfig) -> std::io::Result<()> {
    canvas.draw_text(
        text,
        BANNER_FONT,
        C_TEXT,
        config.screen_width / 2,
        config.screen_height / 2,
    )
}

// ── Headless backend ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Sprite(Sprite, i32, i32),
    Rect { color: Color, x: i32, y: i32, w: i32, h: i32 },
    Text { text: String, font_size: u16, cx: i32, cy: i32 },
}

/// Records the commands of the frame being drawn; `present` publishes them
/// as `last_frame`.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pending: Vec<DrawCommand>,
    pub last_frame: Vec<DrawCommand>,
    pub frames_presented: u64,
}

impl RecordingCanvas {
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_sprites(&self, sprite: Sprite) -> usize {
        self.last_frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite(s, _, _) if *s == sprite))
            .count()
    }

    pub fn count_rects(&self) -> usize {
        self.last_frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Color) -> std::io::Result<()> {
        self.pending.clear();
        self.pending.push(DrawCommand::Clear(color));
        Ok(())
    }

    fn draw_sprite(&mut self, sprite: Sprite, x: i32, y: i32) -> std::io::Result<()> {
        self.pending.push(DrawCommand::Sprite(sprite, x, y));
        Ok(())
    }

    fn draw_filled_rect(&mut self, color: Color, x: i32, y: i32, w: i32, h: i32) -> std::io::Result<()> {
        self.pending.push(DrawCommand::Rect { color, x, y, w, h });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, font_size: u16, _color: Color, cx: i32, cy: i32) -> std::io::Result<()> {
        self.pending.push(DrawCommand::Text {
            text: text.to_string(),
            font_size,
            cx,
            cy,
        });
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
        Ok(())
    }
}
