//! # Transcoder Module
//!
//! Questo modulo costruisce ed esegue l'invocazione di ffmpeg per un file.
//!
//! ## Responsabilità:
//! - Costruisce la `TranscodeRequest` (input, output temporaneo, filtro, tipo)
//! - Genera gli argomenti: `-y -i <input> -filter:a <filtro> [-c:v copy | -vn] <output>`
//! - Esegue ffmpeg in modo sincrono catturando stdout e stderr
//! - In caso di errore elimina l'output temporaneo parziale
//!
//! ## Gestione stream:
//! - **Video**: stream video copiato senza ricodifica (`-c:v copy`)
//! - **Audio**: eventuale stream video (copertina) scartato (`-vn`)
//!
//! ## Esempio:
//! ```ignore
//! let transcoder = Transcoder::new(&config);
//! let request = TranscodeRequest::new(&candidate, &config);
//! transcoder.run(&request).await?;
//! ```

use crate::config::{Config, MediaKind};
use crate::error::NormalizeError;
use crate::file_manager::{CandidateFile, FileManager};
use crate::platform::PlatformCommands;
use crate::progress::ProgressManager;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

/// One ffmpeg invocation
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter_chain: String,
    pub kind: MediaKind,
}

impl TranscodeRequest {
    pub fn new(candidate: &CandidateFile, config: &Config) -> Self {
        Self {
            input: candidate.path.clone(),
            output: FileManager::temp_path(&candidate.path, &config.temp_marker),
            filter_chain: config.loudness.filter_chain(),
            kind: candidate.kind,
        }
    }

    /// Arguments passed to ffmpeg, in order
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            self.input.clone().into(),
            "-filter:a".into(),
            self.filter_chain.clone().into(),
        ];
        match self.kind {
            MediaKind::Video => {
                args.push("-c:v".into());
                args.push("copy".into());
            }
            MediaKind::Audio => args.push("-vn".into()),
        }
        args.push(self.output.clone().into());
        args
    }

    /// Human readable command line, used for reporting
    pub fn command_line(&self, program: &str) -> String {
        let mut line = program.to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Runs ffmpeg
pub struct Transcoder {
    ffmpeg: String,
}

impl Transcoder {
    pub fn new(config: &Config) -> Self {
        Self {
            ffmpeg: PlatformCommands::get_command(&config.ffmpeg_command),
        }
    }

    pub fn program(&self) -> &str {
        &self.ffmpeg
    }

    /// Fail fast when ffmpeg cannot be started
    pub async fn check_dependency(&self) -> Result<String, NormalizeError> {
        PlatformCommands::probe_version(&self.ffmpeg).await
    }

    /// Run the request to completion. On failure the temporary output is
    /// removed and the combined output is carried in the error.
    pub async fn run(&self, request: &TranscodeRequest) -> Result<(), NormalizeError> {
        let name = request
            .input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();
        let spinner = ProgressManager::spinner(&format!("Normalizing {}", name));
        let start_time = std::time::Instant::now();

        let result = Command::new(&self.ffmpeg)
            .args(request.args())
            .kill_on_drop(true)
            .output()
            .await;

        spinner.finish_and_clear();

        let failure = match result {
            Ok(output) if output.status.success() => {
                debug!(
                    "ffmpeg finished {} in {:.1}s",
                    name,
                    start_time.elapsed().as_secs_f64()
                );
                return Ok(());
            }
            Ok(output) => {
                // stdout then stderr, not interleaved
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                NormalizeError::Invocation {
                    path: request.input.clone(),
                    status: output.status.to_string(),
                    output: combined,
                }
            }
            Err(e) => NormalizeError::Invocation {
                path: request.input.clone(),
                status: format!("failed to start {}: {}", self.ffmpeg, e),
                output: String::new(),
            },
        };

        if tokio::fs::remove_file(&request.output).await.is_ok() {
            debug!("Removed partial output {}", request.output.display());
        }
        Err(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request_for(name: &str) -> TranscodeRequest {
        let config = Config::default();
        let path = PathBuf::from("media").join(name);
        let kind = config.classify(&path).unwrap();
        TranscodeRequest::new(&CandidateFile { path, kind }, &config)
    }

    #[test]
    fn test_audio_request_drops_video() {
        let request = request_for("song.mp3");
        let args: Vec<String> = request
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-y".to_string(),
                "-i".to_string(),
                Path::new("media").join("song.mp3").to_string_lossy().into_owned(),
                "-filter:a".to_string(),
                "acompressor,loudnorm=I=-14:TP=-1.8:LRA=11".to_string(),
                "-vn".to_string(),
                Path::new("media")
                    .join("song.__tmp_norm__.mp3")
                    .to_string_lossy()
                    .into_owned(),
            ]
        );
    }

    #[test]
    fn test_video_request_copies_video_stream() {
        let request = request_for("clip.MP4");
        assert_eq!(request.kind, MediaKind::Video);

        let line = request.command_line("ffmpeg");
        assert!(line.starts_with("ffmpeg -y -i "));
        assert!(line.contains(" -c:v copy "));
        assert!(!line.contains("-vn"));
        assert!(line.ends_with("clip.__tmp_norm__.MP4"));
    }

    #[tokio::test]
    async fn test_run_with_missing_tool_reports_invocation_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("a.wav");
        std::fs::write(&input, b"original").unwrap();

        let config = Config {
            ffmpeg_command: "definitely-not-an-installed-ffmpeg".to_string(),
            ..Default::default()
        };
        let request = TranscodeRequest::new(
            &CandidateFile { path: input.clone(), kind: MediaKind::Audio },
            &config,
        );

        let result = Transcoder::new(&config).run(&request).await;

        assert!(matches!(result, Err(NormalizeError::Invocation { .. })));
        assert_eq!(std::fs::read(&input).unwrap(), b"original");
        assert!(!request.output.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_carries_stderr() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("a.wav");
        std::fs::write(&input, b"original").unwrap();

        // `sh` rejects `-y` on stderr with a non-zero exit
        let config = Config {
            ffmpeg_command: "sh".to_string(),
            ..Default::default()
        };
        let request = TranscodeRequest::new(
            &CandidateFile { path: input.clone(), kind: MediaKind::Audio },
            &config,
        );

        match Transcoder::new(&config).run(&request).await {
            Err(NormalizeError::Invocation { output, .. }) => assert!(!output.trim().is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(std::fs::read(&input).unwrap(), b"original");
    }
}
