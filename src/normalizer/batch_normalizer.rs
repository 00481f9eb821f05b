//! # Batch Normalizer Main Orchestrator
//!
//! Orchestratore del run: verifica ffmpeg, elenca la directory e processa
//! i file uno alla volta. Un file è completamente terminato (ffmpeg, backup,
//! sostituzione) prima che inizi il successivo.

use crate::{
    config::Config,
    error::NormalizeError,
    file_manager::FileManager,
    normalizer::task_normalizer::{FileStatus, TaskNormalizer},
    progress::NormalizationStats,
};
use tracing::{debug, info, warn};

/// Sequential batch driver
pub struct BatchNormalizer {
    config: Config,
    task: TaskNormalizer,
}

impl BatchNormalizer {
    pub fn new(config: Config) -> Result<Self, NormalizeError> {
        config.validate()?;
        let task = TaskNormalizer::new(config.clone());
        Ok(Self { config, task })
    }

    /// Run the whole batch.
    ///
    /// Only a missing ffmpeg or an unreadable directory is returned as an
    /// error, in which case no file has been touched.
    pub async fn run(&self) -> Result<NormalizationStats, NormalizeError> {
        let start_time = std::time::Instant::now();
        let dir = &self.config.target_directory;

        let version = self.task.transcoder().check_dependency().await?;
        info!("Using {}", version);

        let files = FileManager::find_media_files(&self.config)?;
        info!("Found {} media files in {}", files.len(), dir.display());
        if self.config.dry_run {
            info!("Dry run mode: No files will be modified");
        }

        let program = self.task.transcoder().program();
        let mut stats = NormalizationStats::new();

        for candidate in &files {
            let request = self.task.request_for(candidate);
            println!(">>> {}", request.command_line(program));

            match self.task.process_single_file(&request).await {
                Ok(FileStatus::Normalized) => {
                    println!("✔ Success: {}", candidate.path.display());
                    stats.add_normalized();
                }
                Ok(FileStatus::Planned) => {
                    println!("Planned: {}", candidate.path.display());
                    stats.add_planned();
                }
                Err(e) => {
                    Self::report_failure(&e);
                    stats.add_error(&e);
                }
            }
        }

        println!("{}", stats.format_summary());
        debug!("Run completed in {:.1}s", start_time.elapsed().as_secs_f64());
        println!("done.");

        Ok(stats)
    }

    fn report_failure(error: &NormalizeError) {
        match error {
            NormalizeError::Invocation { path, output, .. } => {
                println!("Failed: {}", path.display());
                warn!("{}", error);
                debug!("ffmpeg output:\n{}", output);
            }
            other => {
                println!("{}", other);
                warn!("{}", other);
            }
        }
    }
}
