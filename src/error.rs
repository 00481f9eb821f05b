//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Categorie di errori:
//! - `MissingDependency`: ffmpeg non disponibile (fatale, nessun file toccato)
//! - `Listing` / `NotADirectory`: directory non leggibile (fatale)
//! - `Invocation`: ffmpeg fallito su un singolo file
//! - `Backup`: impossibile rinominare l'originale nel backup
//! - `ReplaceRestored` / `ReplaceUnrestored`: sostituzione fallita, con o
//!   senza ripristino riuscito dell'originale
//! - `Validation`: configurazione non valida
//!
//! Solo `MissingDependency`, `Listing`, `NotADirectory` e `Validation`
//! interrompono il run;
//! tutti gli altri restano confinati al file corrente.
//!
//! ## Esempio:
//! ```ignore
//! if !probe.status.success() {
//!     return Err(NormalizeError::MissingDependency("ffmpeg".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for loudness normalization
#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    #[error("ffmpeg not found in PATH: {0}")]
    MissingDependency(String),

    #[error("Failed to open directory {}: {source}", .path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to open directory {}: not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("ffmpeg failed for {}: {status}", .path.display())]
    Invocation {
        path: PathBuf,
        status: String,
        /// stdout followed by stderr
        output: String,
    },

    #[error("Backup failed for {}: {source}", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Replace failed for {} (original restored): {source}", .path.display())]
    ReplaceRestored {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Replace failed for {} and restore failed ({restore}); original kept at {}: {source}",
        .path.display(),
        .backup.display()
    )]
    ReplaceUnrestored {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
        restore: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Validation(String),
}

impl NormalizeError {
    /// Errors that abort the whole run before any file is touched
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency(_)
                | Self::Listing { .. }
                | Self::NotADirectory { .. }
                | Self::Validation(_)
        )
    }
}
