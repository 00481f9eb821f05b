//! # Normalizer Module
//!
//! Separa le responsabilità in sottomoduli:
//! - `batch_normalizer`: Orchestratore del run (probe, scan, loop sequenziale)
//! - `task_normalizer`: Pipeline del singolo file (ffmpeg + sostituzione)

pub mod batch_normalizer;
pub mod task_normalizer;

pub use batch_normalizer::BatchNormalizer;
pub use task_normalizer::{FileStatus, TaskNormalizer};
