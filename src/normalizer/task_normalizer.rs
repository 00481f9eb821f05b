//! # Task Normalizer Module
//!
//! Pipeline per il singolo file:
//! `Scanned -> Invoked -> {InvokeFailed | BackedUp -> {BackupFailed | Replaced | ReplaceFailed}}`

use crate::{
    config::Config,
    error::NormalizeError,
    file_manager::{CandidateFile, FileManager},
    transcoder::{TranscodeRequest, Transcoder},
};
use tracing::debug;

/// Terminal state of a file that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Original replaced with the normalized output
    Normalized,
    /// Dry run, nothing was executed
    Planned,
}

/// Worker for a single file
pub struct TaskNormalizer {
    config: Config,
    transcoder: Transcoder,
}

impl TaskNormalizer {
    pub fn new(config: Config) -> Self {
        let transcoder = Transcoder::new(&config);
        Self { config, transcoder }
    }

    pub fn transcoder(&self) -> &Transcoder {
        &self.transcoder
    }

    pub fn request_for(&self, candidate: &CandidateFile) -> TranscodeRequest {
        TranscodeRequest::new(candidate, &self.config)
    }

    /// Invoke ffmpeg on the candidate, then swap the output into place.
    /// Every error returned here is local to this file.
    pub async fn process_single_file(
        &self,
        request: &TranscodeRequest,
    ) -> Result<FileStatus, NormalizeError> {
        if self.config.dry_run {
            return Ok(FileStatus::Planned);
        }

        self.transcoder.run(request).await?;
        debug!("Replacing {} with {}", request.input.display(), request.output.display());

        FileManager::replace_file(&request.input, &request.output, &self.config.backup_suffix).await?;
        Ok(FileStatus::Normalized)
    }
}
