//! Sound effects — fire-and-forget.
//!
//! The loop only ever asks to play an effect or to pause/resume everything;
//! no return value is consulted.  The terminal bell backend is always
//! available, real audio lives behind the `sound` feature.

use std::io::Write;

use crate::entities::Sound;

pub trait Audio {
    fn play(&mut self, sound: Sound);
    /// Pause (not stop) everything that is playing.
    fn pause_all(&mut self);
    fn resume_all(&mut self);
}

/// No audio at all (`audio.enabled = false`).
pub struct SilentAudio;

impl Audio for SilentAudio {
    fn play(&mut self, _sound: Sound) {}
    fn pause_all(&mut self) {}
    fn resume_all(&mut self) {}
}

/// Rings the terminal bell on explosions.  Shots stay quiet, a bell per
/// bullet is too much.
pub struct BellAudio<W: Write> {
    out: W,
    paused: bool,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W) -> Self {
        Self { out, paused: false }
    }
}

impl<W: Write> Audio for BellAudio<W> {
    fn play(&mut self, sound: Sound) {
        if self.paused || sound != Sound::Explosion {
            return;
        }
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }

    fn pause_all(&mut self) {
        self.paused = true;
    }

    fn resume_all(&mut self) {
        self.paused = false;
    }
}

/// Call log, for headless runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioCall {
    Play(Sound),
    PauseAll,
    ResumeAll,
}

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub calls: Vec<AudioCall>,
}

impl RecordingAudio {
    pub fn played(&self, sound: Sound) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == AudioCall::Play(sound))
            .count()
    }
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        self.calls.push(AudioCall::Play(sound));
    }

    fn pause_all(&mut self) {
        self.calls.push(AudioCall::PauseAll);
    }

    fn resume_all(&mut self) {
        self.calls.push(AudioCall::ResumeAll);
    }
}

impl<A: Audio + ?Sized> Audio for Box<A> {
    fn play(&mut self, sound: Sound) {
        (**self).play(sound);
    }

    fn pause_all(&mut self) {
        (**self).pause_all();
    }

    fn resume_all(&mut self) {
        (**self).resume_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_rings_on_explosions_only() {
        let mut bell = BellAudio::new(Vec::new());
        bell.play(Sound::Shoot);
        bell.play(Sound::Explosion);
        assert_eq!(bell.out, b"\x07");
    }

    #[test]
    fn paused_bell_stays_quiet() {
        let mut bell = BellAudio::new(Vec::new());
        bell.pause_all();
        bell.play(Sound::Explosion);
        assert!(bell.out.is_empty());
        bell.resume_all();
        bell.play(Sound::Explosion);
        assert_eq!(bell.out.len(), 1);
    }

    #[test]
    fn boxed_audio_forwards() {
        let mut boxed: Box<RecordingAudio> = Box::default();
        boxed.play(Sound::Shoot);
        boxed.pause_all();
        assert_eq!(boxed.calls, vec![AudioCall::Play(Sound::Shoot), AudioCall::PauseAll]);
    }
}

#[cfg(feature = "sound")]
pub use self::rodio_backend::RodioAudio;

#[cfg(feature = "sound")]
mod rodio_backend {
    use std::io::Cursor;
    use std::path::Path;
    use std::time::Duration;

    use rodio::source::SineWave;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::Audio;
    use crate::config::AudioConfig;
    use crate::entities::Sound;
    use crate::error::{GameError, Result};

    /// Plays effects on the default output device.  Each effect gets its own
    /// sink so overlapping sounds mix and can be paused together.
    pub struct RodioAudio {
        /// Must outlive every sink.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sinks: Vec<Sink>,
        shoot: Option<Vec<u8>>,
        explosion: Option<Vec<u8>>,
        volume: f32,
    }

    impl RodioAudio {
        /// Opens the output device and reads any configured sound files.
        /// Both failures are fatal: the game does not run half-equipped.
        pub fn new(config: &AudioConfig) -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
                sinks: Vec::new(),
                shoot: read_clip(config.shoot_file.as_deref())?,
                explosion: read_clip(config.explosion_file.as_deref())?,
                volume: config.volume,
            })
        }
    }

    fn read_clip(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
        match path {
            None => Ok(None),
            Some(path) => std::fs::read(path)
                .map(Some)
                .map_err(|e| GameError::Audio(format!("{}: {}", path.display(), e))),
        }
    }

    impl Audio for RodioAudio {
        fn play(&mut self, sound: Sound) {
            self.sinks.retain(|s| !s.empty());

            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    log::warn!("cannot open sink for {:?}: {}", sound, e);
                    return;
                }
            };
            sink.set_volume(self.volume);

            let clip = match sound {
                Sound::Shoot => self.shoot.as_ref(),
                Sound::Explosion => self.explosion.as_ref(),
            };
            match clip {
                Some(bytes) => match Decoder::new(Cursor::new(bytes.clone())) {
                    Ok(source) => sink.append(source),
                    Err(e) => {
                        log::warn!("cannot decode {:?}: {}", sound, e);
                        return;
                    }
                },
                None => match sound {
                    Sound::Shoot => sink.append(
                        SineWave::new(880.0).take_duration(Duration::from_millis(60)),
                    ),
                    Sound::Explosion => sink.append(
                        SineWave::new(110.0).take_duration(Duration::from_millis(250)),
                    ),
                },
            }
            self.sinks.push(sink);
        }

        fn pause_all(&mut self) {
            for sink in &self.sinks {
                sink.pause();
            }
        }

        fn resume_all(&mut self) {
            for sink in &self.sinks {
                sink.play();
            }
        }
    }
}
