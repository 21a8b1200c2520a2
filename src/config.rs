//! Run configuration
//!
//! Every key is optional; anything missing from the file falls back to the
//! built-in defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::AudioPaths;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("music_volume must be within 0..=1, got {0}")]
    VolumeOutOfRange(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Happy Birthday".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub model_path: PathBuf,
    pub music_path: PathBuf,
    pub candle_blow_sound: PathBuf,
    pub cake_cut_sound: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            model_path: "assets/models/cake.obj".into(),
            music_path: "assets/audio/party_music.mp3".into(),
            candle_blow_sound: "assets/audio/candle_blow.mp3".into(),
            cake_cut_sound: "assets/audio/cake_cut.mp3".into(),
        }
    }
}

impl AssetConfig {
    pub fn audio_paths(&self) -> AudioPaths {
        AudioPaths {
            music: self.music_path.clone(),
            candle_blow: self.candle_blow_sound.clone(),
            cake_cut: self.cake_cut_sound.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    /// Text shown when the message step is reached
    pub message: String,
    /// Volume the background music starts at
    pub music_volume: f32,
    /// Fixed RNG seed for reproducible balloon and confetti placement
    pub seed: Option<u64>,
    pub window: WindowConfig,
    pub assets: AssetConfig,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            message: "Happy Birthday!".to_string(),
            music_volume: 0.5,
            seed: None,
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl PartyConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(ConfigError::VolumeOutOfRange(self.music_volume));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PartyConfig::from_toml_str("").unwrap();
        assert_eq!(config, PartyConfig::default());
        assert_eq!(config.assets.model_path, PathBuf::from("assets/models/cake.obj"));
        assert_eq!(config.music_volume, 0.5);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PartyConfig::from_toml_str(
            r#"
            message = "Happy 30th, Sam!"
            seed = 42

            [window]
            width = 800
            "#,
        )
        .unwrap();

        assert_eq!(config.message, "Happy 30th, Sam!");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let err = PartyConfig::from_toml_str("music_volume = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::VolumeOutOfRange(v) if v == 1.5));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            PartyConfig::from_toml_str("message = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut config = PartyConfig::default();
        config.seed = Some(7);
        let text = config.to_toml_string().unwrap();
        assert_eq!(PartyConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = PartyConfig::load(Path::new("nowhere/party.toml")).unwrap_err();
        assert!(err.to_string().contains("nowhere/party.toml"));
    }
}
