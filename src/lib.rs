//! # Loudness Normalizer Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione, target di loudness e classificazione estensioni
//! - `error`: Tipi di errore custom (fatali e per singolo file)
//! - `file_manager`: Discovery dei media e sostituzione sicura con backup
//! - `transcoder`: Costruzione ed esecuzione del comando ffmpeg
//! - `platform`: Nome dell'eseguibile per piattaforma e probe della versione
//! - `normalizer`: Orchestratore del run e pipeline per singolo file
//! - `progress`: Spinner e statistiche
//!
//! ## Utilizzo:
//! ```ignore
//! use loudness_normalizer::{BatchNormalizer, Config};
//!
//! let normalizer = BatchNormalizer::new(Config::default())?;
//! let stats = normalizer.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod file_manager;
pub mod normalizer;
pub mod platform;
pub mod progress;
pub mod transcoder;

pub use config::{Config, LoudnessTarget, MediaKind};
pub use error::NormalizeError;
pub use file_manager::{CandidateFile, FileManager};
pub use normalizer::BatchNormalizer;
pub use progress::NormalizationStats;
