//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri di normalizzazione
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Classifica i file come audio o video in base all'estensione
//!
//! ## Parametri di configurazione:
//! - `target_directory`: Directory da processare (default: ".")
//! - `loudness`: Target loudnorm (I=-14 LUFS, TP=-1.8 dBTP, LRA=11 LU)
//! - `audio_extensions`: mp3, m4a, aac, wav, flac, ogg
//! - `video_extensions`: mp4, mov, mkv, webm
//! - `ffmpeg_command`: Eseguibile ffmpeg (default: "ffmpeg")
//! - `temp_marker`: Token del file temporaneo (default: "__tmp_norm__")
//! - `backup_suffix`: Suffisso del backup (default: ".bak")
//! - `dry_run`: Stampa i comandi senza modificare file (default: false)
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     target_directory: PathBuf::from("/music"),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::error::NormalizeError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Kind of media stream layout, decides how the video stream is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Audio only, any video stream (cover art) is dropped
    Audio,
    /// Video stream is copied untouched, only audio is filtered
    Video,
}

/// Loudness targets fed to ffmpeg's `loudnorm` filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnessTarget {
    /// Integrated loudness (LUFS)
    pub integrated_lufs: f64,
    /// True peak ceiling (dBTP)
    pub true_peak_dbtp: f64,
    /// Loudness range target (LU)
    pub loudness_range_lu: f64,
}

impl Default for LoudnessTarget {
    fn default() -> Self {
        Self {
            integrated_lufs: -14.0,
            true_peak_dbtp: -1.8,
            loudness_range_lu: 11.0,
        }
    }
}

impl LoudnessTarget {
    /// Compressor followed by loudness normalization
    pub fn filter_chain(&self) -> String {
        format!(
            "acompressor,loudnorm=I={}:TP={}:LRA={}",
            self.integrated_lufs, self.true_peak_dbtp, self.loudness_range_lu
        )
    }

    fn validate(&self) -> Result<(), NormalizeError> {
        if !(-70.0..=-5.0).contains(&self.integrated_lufs) {
            return Err(NormalizeError::Validation(
                "Integrated loudness must be between -70 and -5 LUFS".to_string(),
            ));
        }
        if !(-9.0..=0.0).contains(&self.true_peak_dbtp) {
            return Err(NormalizeError::Validation(
                "True peak must be between -9 and 0 dBTP".to_string(),
            ));
        }
        if !(1.0..=50.0).contains(&self.loudness_range_lu) {
            return Err(NormalizeError::Validation(
                "Loudness range must be between 1 and 50 LU".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a normalization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory whose immediate entries are normalized
    pub target_directory: PathBuf,
    /// Loudness targets
    pub loudness: LoudnessTarget,
    /// Lowercase audio extensions, without dot
    pub audio_extensions: BTreeSet<String>,
    /// Lowercase video extensions, without dot
    pub video_extensions: BTreeSet<String>,
    /// ffmpeg executable name or path
    pub ffmpeg_command: String,
    /// Token inserted before the extension of the temporary output
    pub temp_marker: String,
    /// Suffix appended to the original while it is being replaced
    pub backup_suffix: String,
    /// Dry run - print the commands, don't touch any file
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from("."),
            loudness: LoudnessTarget::default(),
            audio_extensions: ["mp3", "m4a", "aac", "wav", "flac", "ogg"]
                .into_iter()
                .map(String::from)
                .collect(),
            video_extensions: ["mp4", "mov", "mkv", "webm"]
                .into_iter()
                .map(String::from)
                .collect(),
            ffmpeg_command: "ffmpeg".to_string(),
            temp_marker: "__tmp_norm__".to_string(),
            backup_suffix: ".bak".to_string(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), NormalizeError> {
        self.loudness.validate()?;

        for (label, set) in [
            ("audio", &self.audio_extensions),
            ("video", &self.video_extensions),
        ] {
            if set.is_empty() {
                return Err(NormalizeError::Validation(format!(
                    "At least one {} extension is required",
                    label
                )));
            }
            if let Some(bad) = set
                .iter()
                .find(|ext| ext.is_empty() || ext.contains('.') || **ext != ext.to_lowercase())
            {
                return Err(NormalizeError::Validation(format!(
                    "Invalid {} extension '{}': use lowercase names without dot",
                    label, bad
                )));
            }
        }

        if let Some(shared) = self.audio_extensions.intersection(&self.video_extensions).next() {
            return Err(NormalizeError::Validation(format!(
                "Extension '{}' is listed as both audio and video",
                shared
            )));
        }

        if self.ffmpeg_command.trim().is_empty() {
            return Err(NormalizeError::Validation("ffmpeg command must not be empty".to_string()));
        }
        if self.temp_marker.is_empty() || self.backup_suffix.is_empty() {
            return Err(NormalizeError::Validation(
                "Temporary marker and backup suffix must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Extension of a dot-file such as `.mp3`, which `Path::extension`
    /// treats as a bare stem
    pub fn dot_file_extension(path: &Path) -> Option<String> {
        if path.extension().is_some() {
            return None;
        }
        let name = path.file_name()?.to_string_lossy();
        let ext = name.strip_prefix('.')?;
        (!ext.is_empty()).then(|| ext.to_string())
    }

    /// Classify a path by its extension, case-insensitively
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => Self::dot_file_extension(path)?.to_lowercase(),
        };
        if self.audio_extensions.contains(&ext) {
            Some(MediaKind::Audio)
        } else if self.video_extensions.contains(&ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("loudnorm-batch").join("config.json"))
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_filter_chain() {
        let config = Config::default();
        assert_eq!(
            config.loudness.filter_chain(),
            "acompressor,loudnorm=I=-14:TP=-1.8:LRA=11"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.loudness.integrated_lufs = -2.0;
        assert!(config.validate().is_err());

        config.loudness = LoudnessTarget::default();
        config.loudness.true_peak_dbtp = 1.0;
        assert!(config.validate().is_err());

        config.loudness = LoudnessTarget::default();
        config.video_extensions.insert("mp3".to_string());
        assert!(config.validate().is_err());

        config = Config::default();
        config.audio_extensions.insert(".MP3".to_string());
        assert!(config.validate().is_err());

        config = Config::default();
        config.video_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let config = Config::default();
        assert_eq!(config.classify(Path::new("song.MP3")), Some(MediaKind::Audio));
        assert_eq!(config.classify(Path::new("dir/take.Flac")), Some(MediaKind::Audio));
        assert_eq!(config.classify(Path::new("clip.mkv")), Some(MediaKind::Video));
        assert_eq!(config.classify(Path::new("readme.txt")), None);
        assert_eq!(config.classify(Path::new("photo.jpg")), None);
        assert_eq!(config.classify(Path::new("song.mp3.bak")), None);
        assert_eq!(config.classify(Path::new("Makefile")), None);
    }

    #[test]
    fn test_classify_dot_file_named_after_extension() {
        let config = Config::default();
        assert_eq!(config.classify(Path::new("music/.mp3")), Some(MediaKind::Audio));
        assert_eq!(config.classify(Path::new(".MKV")), Some(MediaKind::Video));
        assert_eq!(config.classify(Path::new(".bashrc")), None);
        assert_eq!(config.classify(Path::new(".")), None);
        assert_eq!(Config::dot_file_extension(Path::new("a.mp3")), None);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let original_config = Config {
            loudness: LoudnessTarget {
                integrated_lufs: -16.0,
                true_peak_dbtp: -1.0,
                loudness_range_lu: 7.0,
            },
            dry_run: true,
            ..Default::default()
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.loudness, original_config.loudness);
        assert!(loaded_config.dry_run);
        assert_eq!(loaded_config.audio_extensions, original_config.audio_extensions);
        assert_eq!(
            loaded_config.loudness.filter_chain(),
            "acompressor,loudnorm=I=-16:TP=-1:LRA=7"
        );
    }

    #[tokio::test]
    async fn test_partial_config_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, r#"{ "ffmpeg_command": "/opt/ffmpeg/bin/ffmpeg" }"#)
            .await
            .unwrap();

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.ffmpeg_command, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.temp_marker, "__tmp_norm__");
        assert_eq!(config.loudness, LoudnessTarget::default());
    }

    #[tokio::test]
    async fn test_missing_config_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join("absent.json"))
            .await
            .unwrap();
        assert_eq!(config.backup_suffix, ".bak");
        assert!(!config.dry_run);
    }

    #[tokio::test]
    async fn test_invalid_config_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        tokio::fs::write(&config_path, r#"{ "loudness": { "integrated_lufs": 3.0 } }"#)
            .await
            .unwrap();

        assert!(Config::from_file(&config_path).await.is_err());
    }
}
