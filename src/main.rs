//! # Loudness Normalizer - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione (file JSON opzionale)
//! - Avvio del `BatchNormalizer`
//!
//! Gli errori fatali (ffmpeg assente, directory non leggibile) vengono
//! stampati su una riga; il processo termina comunque normalmente.
//!
//! ## Esempio di utilizzo:
//! ```bash
//! loudnorm-batch /path/to/music --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use loudness_normalizer::{platform::PlatformCommands, BatchNormalizer, Config};

#[derive(Parser)]
#[command(name = "loudnorm-batch")]
#[command(about = "Normalize the loudness of every audio and video file in a directory, in place")]
struct Args {
    /// Directory containing media files to normalize
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// JSON configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dry run - print the ffmpeg commands, don't touch any file
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Platform: {}", PlatformCommands::system_info());

    let mut config = match args.config.or_else(Config::default_path) {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Config::from_file(&path).await?
        }
        None => Config::default(),
    };
    config.target_directory = args.directory;
    config.dry_run |= args.dry_run;

    let normalizer = BatchNormalizer::new(config)?;
    if let Err(e) = normalizer.run().await {
        println!("{}", e);
    }

    Ok(())
}
