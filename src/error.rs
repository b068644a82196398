use thiserror::Error;

/// Errors from loading `space_shooter.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Fatal startup and runtime failures.  Game over is not an error.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
