//! # Audio Module
//!
//! Background music plus two one-shot sound effects. [`AudioOutput`] is the
//! seam the app talks to: [`RodioAudio`] plays through the default output
//! device, [`SilentAudio`] stands in when there is none and only logs.

pub mod rodio_output;

use std::path::PathBuf;

use thiserror::Error;

pub use rodio_output::RodioAudio;

/// Fire-and-forget effects the party plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    CandleBlow,
    CakeCut,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available: {0}")]
    OutputUnavailable(String),
    #[error("cannot open audio file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot decode audio file {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
}

/// Audio files used by the party
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPaths {
    pub music: PathBuf,
    pub candle_blow: PathBuf,
    pub cake_cut: PathBuf,
}

impl AudioPaths {
    pub fn effect(&self, effect: SoundEffect) -> &PathBuf {
        match effect {
            SoundEffect::CandleBlow => &self.candle_blow,
            SoundEffect::CakeCut => &self.cake_cut,
        }
    }
}

/// Sink for everything the party wants to hear
pub trait AudioOutput {
    /// Plays an effect without keeping a handle to it
    fn play_effect(&mut self, effect: SoundEffect) -> Result<(), AudioError>;

    /// Starts the background music from the beginning at `volume`
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;

    /// Pauses or resumes the music; returns true if it is now playing
    fn toggle_music(&mut self) -> bool;

    fn set_music_volume(&mut self, volume: f32);

    fn is_music_playing(&self) -> bool;
}

/// Output used when no audio device could be opened
#[derive(Debug, Default)]
pub struct SilentAudio {
    music_started: bool,
    paused: bool,
    volume: f32,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioOutput for SilentAudio {
    fn play_effect(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        log::debug!("(silent) effect {effect:?}");
        Ok(())
    }

    fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
        log::debug!("(silent) music started at volume {volume}");
        self.music_started = true;
        self.paused = false;
        self.volume = volume;
        Ok(())
    }

    fn toggle_music(&mut self) -> bool {
        if self.music_started {
            self.paused = !self.paused;
        }
        self.is_music_playing()
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn is_music_playing(&self) -> bool {
        self.music_started && !self.paused
    }
}

/// Opens the default device, falling back to silence
pub fn open_output(paths: AudioPaths) -> Box<dyn AudioOutput> {
    match RodioAudio::new(paths) {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            log::warn!("{err}, continuing without sound");
            Box::new(SilentAudio::new())
        }
    }
}
