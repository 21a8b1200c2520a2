//! Rodio playback on the default output device

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::{AudioError, AudioOutput, AudioPaths, SoundEffect};

pub struct RodioAudio {
    /// Must stay alive for anything to be heard
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    paths: AudioPaths,
}

impl RodioAudio {
    pub fn new(paths: AudioPaths) -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::OutputUnavailable(e.to_string()))?;
        log::info!("Audio output opened");

        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            paths,
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        Sink::try_new(&self.handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))
    }
}

impl AudioOutput for RodioAudio {
    fn play_effect(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        let source = Self::decode(self.paths.effect(effect))?;
        let sink = self.new_sink()?;
        sink.append(source);
        sink.detach();
        log::debug!("Playing effect {effect:?}");
        Ok(())
    }

    fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
        let source = Self::decode(&self.paths.music)?;
        let sink = self.new_sink()?;
        sink.set_volume(volume);
        sink.append(source);

        if let Some(previous) = self.music.replace(sink) {
            previous.stop();
        }
        log::info!("Music started at volume {volume}");
        Ok(())
    }

    fn toggle_music(&mut self) -> bool {
        let Some(music) = &self.music else {
            log::debug!("Music toggle pressed before music started");
            return false;
        };

        if music.is_paused() {
            music.play();
        } else {
            music.pause();
        }
        self.is_music_playing()
    }

    fn set_music_volume(&mut self, volume: f32) {
        if let Some(music) = &self.music {
            music.set_volume(volume);
        }
    }

    fn is_music_playing(&self) -> bool {
        self.music
            .as_ref()
            .is_some_and(|music| !music.is_paused() && !music.empty())
    }
}
