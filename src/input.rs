//! Keyboard input as a queue of discrete events.
//!
//! The terminal is read on a dedicated thread and events arrive through a
//! channel, so the frame loop never blocks on I/O.  Each frame drains the
//! whole queue.
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
//!   `Press` / `Repeat` / `Release` events, releases become `KeyUp`.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`).  A movement key that has not been refreshed within
//!   `HOLD_WINDOW` frames is treated as released and gets a synthetic `KeyUp`.

use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::entities::{InputEvent, Key};

/// Frames a movement key stays held without a fresh press (≈133 ms at 60 FPS).
pub const HOLD_WINDOW: u64 = 8;

pub trait InputSource {
    /// Every event that arrived since the previous call.
    fn poll(&mut self) -> Vec<InputEvent>;
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::PauseToggle),
        _ => None,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn is_movement(key: Key) -> bool {
    matches!(key, Key::Left | Key::Right)
}

/// Turns raw crossterm events into `InputEvent`s, one frame at a time.
pub struct KeyTranslator {
    /// Terminal reports key releases.
    enhanced: bool,
    /// Movement key → frame it was last pressed or repeated.
    held: HashMap<Key, u64>,
    frame: u64,
}

impl KeyTranslator {
    pub fn new(enhanced: bool) -> Self {
        Self {
            enhanced,
            held: HashMap::new(),
            frame: 0,
        }
    }

    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn feed(&mut self, event: &Event) -> Option<InputEvent> {
        let Event::Key(key_event) = event else {
            return None;
        };
        let (code, kind, modifiers) = (key_event.code, key_event.kind, key_event.modifiers);

        if kind == KeyEventKind::Press && is_quit(code, modifiers) {
            return Some(InputEvent::Quit);
        }
        let key = map_key(code)?;

        match kind {
            KeyEventKind::Press => {
                if is_movement(key) {
                    let already_held = self.held.insert(key, self.frame).is_some();
                    if !self.enhanced {
                        // Without releases, a new direction replaces the old one.
                        self.held.retain(|k, _| *k == key);
                        if already_held {
                            return None;
                        }
                    }
                }
                Some(InputEvent::KeyDown(key))
            }
            // Repeat: refresh timestamp so key stays "held"
            KeyEventKind::Repeat => {
                if is_movement(key) {
                    self.held.insert(key, self.frame);
                }
                None
            }
            KeyEventKind::Release => {
                self.held.remove(&key);
                Some(InputEvent::KeyUp(key))
            }
        }
    }

    /// Synthetic releases for movement keys that went quiet.
    pub fn expire(&mut self) -> Vec<InputEvent> {
        if self.enhanced {
            return Vec::new();
        }
        let frame = self.frame;
        let mut stale: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        stale.sort_by_key(|k| *k as u8);
        for key in &stale {
            self.held.remove(key);
        }
        stale.into_iter().map(InputEvent::KeyUp).collect()
    }
}

/// Live keyboard input from the terminal.
pub struct TerminalInput {
    rx: Receiver<Event>,
    translator: KeyTranslator,
}

impl TerminalInput {
    /// Dedicate a thread exclusively to blocking event reads, sending them
    /// through a channel.
    pub fn spawn(enhanced: bool) -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(e) => {
                    log::error!("terminal input failed: {}", e);
                    break;
                }
            }
        });
        Self {
            rx,
            translator: KeyTranslator::new(enhanced),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.translator.next_frame();
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(ev) => events.extend(self.translator.feed(&ev)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Nobody can press Q any more.
                    events.push(InputEvent::Quit);
                    break;
                }
            }
        }
        events.extend(self.translator.expire());
        events
    }
}

/// Pre-recorded input, one batch per frame; empty once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}
