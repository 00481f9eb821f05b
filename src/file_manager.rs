//! # File Management Module
//!
//! Questo modulo gestisce tutte le operazioni sui file e la discovery di media.
//!
//! ## Responsabilità:
//! - Discovery NON ricorsiva dei file media in una directory
//! - Determinazione tipo file (audio vs video) tramite `Config::classify`
//! - Calcolo dei path fratelli (file temporaneo e backup)
//! - Sostituzione sicura dell'originale con backup e ripristino
//!
//! ## Sequenza di sostituzione (`replace_file`):
//! 1. Rimuove un eventuale `<originale>.bak` preesistente (best-effort)
//! 2. Rinomina originale -> backup; se fallisce elimina il temporaneo
//! 3. Rinomina temporaneo -> originale; se fallisce ripristina il backup
//! 4. Rimuove il backup (best-effort)
//!
//! In ogni momento esiste l'originale oppure il suo backup: l'unica finestra
//! in cui il nome originale manca è il singolo rename del passo 3.
//!
//! ## Esempio:
//! ```ignore
//! let files = FileManager::find_media_files(&config)?;
//! for file in files {
//!     let temp = FileManager::temp_path(&file.path, &config.temp_marker);
//!     // ... ffmpeg scrive su temp ...
//!     FileManager::replace_file(&file.path, &temp, &config.backup_suffix).await?;
//! }
//! ```

use crate::config::{Config, MediaKind};
use crate::error::NormalizeError;
use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A directory entry eligible for normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// Manages file discovery and in-place replacement
pub struct FileManager;

impl FileManager {
    /// List the immediate non-directory entries of the target directory whose
    /// extension is a known audio or video one, sorted by file name.
    ///
    /// Any listing error aborts the scan; no partial result is returned.
    pub fn find_media_files(config: &Config) -> Result<Vec<CandidateFile>, NormalizeError> {
        let dir = &config.target_directory;
        let mut files = Vec::new();

        // WalkDir yields nothing past depth 0 for a plain file
        if std::fs::metadata(dir).is_ok_and(|meta| !meta.is_dir()) {
            return Err(NormalizeError::NotADirectory { path: dir.clone() });
        }

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| NormalizeError::Listing {
                path: dir.clone(),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            match config.classify(entry.path()) {
                Some(kind) => files.push(CandidateFile {
                    path: entry.into_path(),
                    kind,
                }),
                None => debug!("Skipping unsupported file: {}", entry.path().display()),
            }
        }

        Ok(files)
    }

    /// `dir/name.ext` -> `dir/name.<marker>.ext`, and `dir/.ext` -> `dir/.<marker>.ext`
    pub fn temp_path(original: &Path, marker: &str) -> PathBuf {
        if let Some(ext) = Config::dot_file_extension(original) {
            return original.with_file_name(format!(".{}.{}", marker, ext));
        }

        let stem = original.file_stem().unwrap_or_default();
        let mut name = OsString::from(stem);
        name.push(".");
        name.push(marker);
        if let Some(ext) = original.extension() {
            name.push(".");
            name.push(ext);
        }
        original.with_file_name(name)
    }

    /// `dir/name.ext` -> `dir/name.ext<suffix>`
    pub fn backup_path(original: &Path, suffix: &str) -> PathBuf {
        let mut path = original.as_os_str().to_owned();
        path.push(suffix);
        PathBuf::from(path)
    }

    /// Swap `replacement` into `original`'s place, keeping a backup of the
    /// original until the swap has succeeded.
    pub async fn replace_file(
        original: &Path,
        replacement: &Path,
        backup_suffix: &str,
    ) -> Result<(), NormalizeError> {
        Self::replace_file_with(original, replacement, backup_suffix, |from, to| {
            fs::rename(from, to)
        })
        .await
    }

    async fn replace_file_with<F, Fut>(
        original: &Path,
        replacement: &Path,
        backup_suffix: &str,
        rename: F,
    ) -> Result<(), NormalizeError>
    where
        F: Fn(PathBuf, PathBuf) -> Fut,
        Fut: Future<Output = io::Result<()>>,
    {
        let backup = Self::backup_path(original, backup_suffix);

        // Leftover from an interrupted run
        let _ = fs::remove_file(&backup).await;

        if let Err(source) = rename(original.to_path_buf(), backup.clone()).await {
            let _ = fs::remove_file(replacement).await;
            return Err(NormalizeError::Backup {
                path: original.to_path_buf(),
                source,
            });
        }
        debug!("Backed up {} -> {}", original.display(), backup.display());

        if let Err(source) = rename(replacement.to_path_buf(), original.to_path_buf()).await {
            return match rename(backup.clone(), original.to_path_buf()).await {
                Ok(()) => {
                    let _ = fs::remove_file(replacement).await;
                    Err(NormalizeError::ReplaceRestored {
                        path: original.to_path_buf(),
                        source,
                    })
                }
                Err(restore) => {
                    // Both the normalized output and the backup stay on disk.
                    warn!(
                        "Could not restore {} from {}",
                        original.display(),
                        backup.display()
                    );
                    Err(NormalizeError::ReplaceUnrestored {
                        path: original.to_path_buf(),
                        backup,
                        source,
                        restore,
                    })
                }
            };
        }

        if let Err(e) = fs::remove_file(&backup).await {
            debug!("Could not remove backup {}: {}", backup.display(), e);
        }
        Ok(())
    }
}
