//! Game configuration, read from an optional TOML file.
//!
//! Every field has a default, so a partial file only overrides what it
//! names.  The defaults are the classic arcade constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SPACE_SHOOTER_CONFIG";
/// Looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "space_shooter.toml";

/// Largest accepted screen dimension, in logical pixels.
pub const MAX_SCREEN: i32 = 100_000;
pub const MAX_FPS: u32 = 1000;

/// What a bullet overlapping several enemies in the same frame does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletHitPolicy {
    /// The bullet is spent on the first enemy it overlaps.
    FirstHit,
    /// The bullet destroys (and scores) every enemy it overlaps this frame.
    AllOverlapping,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub title: String,

    pub player_size: i32,
    pub player_speed: i32,
    pub enemy_size: i32,
    pub enemy_speed: i32,
    pub bullet_size: i32,
    pub bullet_speed: i32,

    pub max_bullets: usize,
    pub max_enemies: usize,
    /// Inclusive vertical range new enemies appear in.
    pub spawn_min_y: i32,
    pub spawn_max_y: i32,
    pub kill_score: u32,
    pub bullet_hit_policy: BulletHitPolicy,

    pub fps: u32,
    pub game_over_hold_ms: u64,

    pub high_score_file: PathBuf,
    pub log_file: PathBuf,
    pub audio: AudioConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Optional sound files; synthesized tones are used when absent.
    pub shoot_file: Option<PathBuf>,
    pub explosion_file: Option<PathBuf>,
    /// 0.0 - 1.0
    pub volume: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            title: "Space Invaders".to_string(),
            player_size: 50,
            player_speed: 5,
            enemy_size: 50,
            enemy_speed: 2,
            bullet_size: 10,
            bullet_speed: 7,
            max_bullets: 5,
            max_enemies: 10,
            spawn_min_y: 50,
            spawn_max_y: 200,
            kill_score: 20,
            bullet_hit_policy: BulletHitPolicy::FirstHit,
            fps: 60,
            game_over_hold_ms: 3000,
            high_score_file: PathBuf::from("high_score.txt"),
            log_file: PathBuf::from("space_shooter.log"),
            audio: AudioConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shoot_file: None,
            explosion_file: None,
            volume: 0.3,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resolve the config the way the binary does: `$SPACE_SHOOTER_CONFIG`,
    /// then `./space_shooter.toml`, then built-in defaults.
    ///
    /// An explicitly named file must exist; the implicit one may be absent.
    pub fn discover() -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(explicit);
            return Ok((Self::load_from_file(&path)?, Some(path)));
        }
        let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            return Ok((Self::load_from_file(&implicit)?, Some(implicit)));
        }
        Ok((Self::default(), None))
    }

    /// Rejects values the simulation cannot run with.  Everything is
    /// bounded by the screen, which is itself capped at `MAX_SCREEN`, so
    /// positions and sizes stay far from `i32` overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(1..=MAX_SCREEN).contains(&self.screen_width)
            || !(1..=MAX_SCREEN).contains(&self.screen_height)
        {
            return invalid("screen dimensions must be within 1 - 100000");
        }
        if self.player_size <= 0 || self.enemy_size <= 0 || self.bullet_size <= 0 {
            return invalid("entity sizes must be positive");
        }
        if self.screen_width < self.player_size.max(self.enemy_size).max(self.bullet_size)
            || self.screen_height < self.player_size * 2
            || self.screen_height < self.enemy_size.max(self.bullet_size)
        {
            return invalid("screen is smaller than the entities it holds");
        }
        if self.spawn_min_y > self.spawn_max_y {
            return invalid("spawn_min_y is above spawn_max_y");
        }
        if self.spawn_min_y < 0 || self.spawn_max_y > self.screen_height {
            return invalid("spawn band must lie on the screen");
        }
        if self.player_speed < 0 || self.enemy_speed < 0 || self.bullet_speed < 0 {
            return invalid("speeds must not be negative");
        }
        if self.player_speed > self.screen_width
            || self.enemy_speed > self.screen_height
            || self.bullet_speed > self.screen_height
        {
            return invalid("speeds must not exceed the screen per frame");
        }
        if !(1..=MAX_FPS).contains(&self.fps) {
            return invalid("fps must be within 1 - 1000");
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return invalid("audio.volume must be within 0.0 - 1.0");
        }
        Ok(())
    }
}
