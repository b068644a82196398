//! The frame loop: input → simulation → collision → render → frame cap.
//!
//! `GameLoop` owns the state and every collaborator.  `run_frame` is one
//! iteration without any pacing, so tests drive it headlessly frame by frame.

use rand::Rng;

use crate::audio::Audio;
use crate::compute::{apply_input, init_state, tick};
use crate::config::GameConfig;
use crate::display::{render, Canvas};
use crate::entities::{FrameEvent, GameState, GameStatus, InputEvent};
use crate::error::Result;
use crate::input::InputSource;
use crate::schedule::Pacer;
use crate::storage::ScoreStore;

/// What the caller should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
    GameOver,
}

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    /// Game over and the banner hold ran out.
    GameOver,
}

pub struct GameLoop<C, A, S, R> {
    config: GameConfig,
    state: GameState,
    canvas: C,
    audio: A,
    store: S,
    rng: R,
}

impl<C: Canvas, A: Audio, S: ScoreStore, R: Rng> GameLoop<C, A, S, R> {
    /// Loads the high score once and sets up a fresh game.
    pub fn new(config: GameConfig, canvas: C, audio: A, store: S, rng: R) -> Self {
        let high_score = store.load();
        log::info!("loaded high score {}", high_score);
        let state = init_state(&config, high_score);
        Self {
            config,
            state,
            canvas,
            audio,
            store,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One frame.  A `Quit` anywhere in `events` wins over everything else
    /// and nothing else in the batch is applied.
    pub fn run_frame(&mut self, events: &[InputEvent]) -> Result<LoopControl> {
        if events.contains(&InputEvent::Quit) {
            log::info!("quit requested at frame {}", self.state.frame);
            return Ok(LoopControl::Quit);
        }

        for &event in events {
            let (next, effects) = apply_input(&self.state, &self.config, event);
            self.state = next;
            self.dispatch(effects);
        }

        let (next, effects) = tick(&self.state, &self.config, &mut self.rng);
        self.state = next;
        self.dispatch(effects);

        render(&mut self.canvas, &self.state, &self.config)?;

        Ok(match self.state.status {
            GameStatus::GameOver => LoopControl::GameOver,
            GameStatus::Running | GameStatus::Paused => LoopControl::Continue,
        })
    }

    /// Run until quit, or until game over plus the banner hold.
    pub fn run<I: InputSource, P: Pacer>(&mut self, input: &mut I, pacer: &mut P) -> Result<SessionEnd> {
        loop {
            pacer.begin_frame();
            let events = input.poll();
            let control = self.run_frame(&events)?;
            match control {
                LoopControl::Continue => pacer.end_frame(),
                LoopControl::Quit => return Ok(SessionEnd::Quit),
                LoopControl::GameOver => {
                    pacer.end_frame();
                    return Ok(self.hold_game_over(input, pacer));
                }
            }
        }
    }

    /// Keep the "GAME OVER" banner up for the configured hold, still
    /// honouring quit.
    fn hold_game_over<I: InputSource, P: Pacer>(&mut self, input: &mut I, pacer: &mut P) -> SessionEnd {
        let frames = self
            .config
            .game_over_hold_ms
            .saturating_mul(u64::from(self.config.fps))
            / 1000;
        for _ in 0..frames {
            pacer.begin_frame();
            if input.poll().contains(&InputEvent::Quit) {
                log::info!("quit during game-over hold");
                return SessionEnd::Quit;
            }
            pacer.end_frame();
        }
        SessionEnd::GameOver
    }

    fn dispatch(&mut self, effects: Vec<FrameEvent>) {
        for effect in effects {
            match effect {
                FrameEvent::Play(sound) => self.audio.play(sound),
                FrameEvent::Paused => {
                    log::info!("paused at frame {}", self.state.frame);
                    self.audio.pause_all();
                }
                FrameEvent::Resumed => {
                    log::info!("resumed at frame {}", self.state.frame);
                    self.audio.resume_all();
                }
                FrameEvent::GameOver => {
                    log::info!(
                        "game over at frame {} with score {}",
                        self.state.frame,
                        self.state.score
                    );
                }
                FrameEvent::HighScore(score) => match self.store.store(score) {
                    Ok(()) => log::debug!("new high score {}", score),
                    // Play goes on; the in-memory high score is unaffected.
                    Err(e) => log::warn!("could not persist high score {}: {}", score, e),
                },
            }
        }
    }
}
