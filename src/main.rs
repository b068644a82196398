use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use space_shooter::audio::{Audio, SilentAudio};
use space_shooter::config::GameConfig;
use space_shooter::display::terminal::TerminalCanvas;
use space_shooter::error::Result;
use space_shooter::game_loop::{GameLoop, SessionEnd};
use space_shooter::input::TerminalInput;
use space_shooter::schedule::FrameClock;
use space_shooter::storage::FileScoreStore;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to a file.
fn init_logging(path: &Path) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("space_shooter: logging disabled, cannot open {}: {}", path.display(), e);
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

// ── Audio ─────────────────────────────────────────────────────────────────────

fn open_audio(config: &GameConfig) -> Result<Box<dyn Audio>> {
    if !config.audio.enabled {
        log::info!("audio disabled");
        return Ok(Box::new(SilentAudio));
    }
    device_audio(config)
}

#[cfg(feature = "sound")]
fn device_audio(config: &GameConfig) -> Result<Box<dyn Audio>> {
    let audio = space_shooter::audio::RodioAudio::new(&config.audio)?;
    log::info!("audio on the default output device");
    Ok(Box::new(audio))
}

#[cfg(not(feature = "sound"))]
fn device_audio(config: &GameConfig) -> Result<Box<dyn Audio>> {
    if config.audio.shoot_file.is_some() || config.audio.explosion_file.is_some() {
        log::warn!("sound files are ignored without the `sound` feature");
    }
    log::info!("audio through the terminal bell");
    Ok(Box::new(space_shooter::audio::BellAudio::new(stdout())))
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let (config, source) = match GameConfig::discover() {
        Ok(found) => found,
        Err(e) => {
            eprintln!("space_shooter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.log_file);
    match &source {
        Some(path) => log::info!("config loaded from {}", path.display()),
        None => log::info!("using default config"),
    }

    match run(config) {
        Ok(end) => {
            log::info!("session ended: {:?}", end);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("space_shooter: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: GameConfig) -> Result<SessionEnd> {
    // Fatal setup problems surface before the terminal switches screens.
    let audio = open_audio(&config)?;
    let store = FileScoreStore::new(&config.high_score_file);
    log::info!("high score file {}", store.path().display());

    let canvas = TerminalCanvas::open(BufWriter::new(stdout()), &config)?;

    // Request key-release (and key-repeat) events where the terminal supports it.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && stdout()
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("keyboard enhancement: {}", keyboard_enhanced);

    let mut input = TerminalInput::spawn(keyboard_enhanced);
    let mut clock = FrameClock::new(config.fps);
    let mut game = GameLoop::new(config, canvas, audio, store, thread_rng());

    let result = game.run(&mut input, &mut clock);

    if keyboard_enhanced {
        let _ = stdout().execute(PopKeyboardEnhancementFlags);
    }
    // Dropping the loop drops the canvas, which restores the terminal.
    drop(game);
    result
}
