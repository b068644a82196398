//! High-score persistence: one integer stored as its decimal text.

use std::path::{Path, PathBuf};

pub trait ScoreStore {
    /// The stored score, or 0 when there is none or it cannot be read.
    fn load(&self) -> u32;
    fn store(&mut self, score: u32) -> std::io::Result<()>;
}

pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().parse().unwrap_or_else(|_| {
                log::warn!("ignoring unparsable high score in {}", self.path.display());
                0
            }),
            Err(e) => {
                log::debug!("no high score at {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn store(&mut self, score: u32) -> std::io::Result<()> {
        std::fs::write(&self.path, score.to_string())
    }
}

/// Keeps the score in memory; `fail_writes` simulates an unavailable disk.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    pub value: Option<u32>,
    pub writes: Vec<u32>,
    pub fail_writes: bool,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn store(&mut self, score: u32) -> std::io::Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "store unavailable",
            ));
        }
        self.value = Some(score);
        self.writes.push(score);
        Ok(())
    }
}
