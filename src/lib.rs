pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod schedule;
pub mod storage;
