//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il feedback visivo e le statistiche del run.
//!
//! ## Componenti principali:
//! - `ProgressManager`: Spinner `indicatif` mostrato mentre ffmpeg lavora
//! - `NormalizationStats`: Contatori per esito di ogni file
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file elaborati
//! - **files_normalized**: File sostituiti con la versione normalizzata
//! - **files_planned**: File solo elencati in modalità dry run
//! - **invoke_failures**: ffmpeg fallito
//! - **backup_failures**: Backup dell'originale fallito
//! - **replace_failures**: Sostituzione fallita, originale ripristinato
//! - **restore_failures**: Sostituzione e ripristino entrambi falliti
//!
//! ## Esempio:
//! ```ignore
//! let spinner = ProgressManager::spinner("Normalizing song.mp3");
//! // ... ffmpeg ...
//! spinner.finish_and_clear();
//! stats.add_normalized();
//! println!("{}", stats.format_summary());
//! ```

use crate::error::NormalizeError;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a normalization run
pub struct ProgressManager;

impl ProgressManager {
    /// Create a spinner for indeterminate progress
    pub fn spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();

        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            spinner.set_style(style);
        }

        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        spinner
    }
}

/// Statistics tracker for normalization results
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizationStats {
    pub files_processed: usize,
    pub files_normalized: usize,
    pub files_planned: usize,
    pub invoke_failures: usize,
    pub backup_failures: usize,
    pub replace_failures: usize,
    pub restore_failures: usize,
}

impl NormalizationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_normalized(&mut self) {
        self.files_processed += 1;
        self.files_normalized += 1;
    }

    pub fn add_planned(&mut self) {
        self.files_processed += 1;
        self.files_planned += 1;
    }

    /// Count a per-file failure under its kind
    pub fn add_error(&mut self, error: &NormalizeError) {
        self.files_processed += 1;
        match error {
            NormalizeError::Backup { .. } => self.backup_failures += 1,
            NormalizeError::ReplaceRestored { .. } => self.replace_failures += 1,
            NormalizeError::ReplaceUnrestored { .. } => self.restore_failures += 1,
            _ => self.invoke_failures += 1,
        }
    }

    pub fn errors(&self) -> usize {
        self.invoke_failures + self.backup_failures + self.replace_failures + self.restore_failures
    }

    pub fn format_summary(&self) -> String {
        let mut summary = format!(
            "Processed: {} files | Normalized: {} | Failed: {} | Backup failed: {} | Replace failed: {}",
            self.files_processed,
            self.files_normalized,
            self.invoke_failures,
            self.backup_failures,
            self.replace_failures + self.restore_failures,
        );
        if self.restore_failures > 0 {
            summary.push_str(&format!(" ({} not restored, see .bak files)", self.restore_failures));
        }
        if self.files_planned > 0 {
            summary.push_str(&format!(" | Planned (dry run): {}", self.files_planned));
        }
        summary
    }
}
