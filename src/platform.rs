//! # Platform-specific utilities
//!
//! Risoluzione del nome dell'eseguibile ffmpeg per la piattaforma corrente
//! e probe di disponibilità tramite `-version`.

use crate::error::NormalizeError;
use tokio::process::Command;
use tracing::debug;

/// Platform-specific command handling
pub struct PlatformCommands;

impl PlatformCommands {
    /// Get the platform-specific command name. Bare names get `.exe` on
    /// Windows, explicit paths are left alone.
    pub fn get_command(base_name: &str) -> String {
        let is_bare = !base_name.contains(['/', '\\']);
        if cfg!(windows) && is_bare && !base_name.to_lowercase().ends_with(".exe") {
            format!("{}.exe", base_name)
        } else {
            base_name.to_string()
        }
    }

    /// Run `<command> -version` and return the first line of its banner.
    ///
    /// Only checks that the tool starts and exits cleanly, not that it
    /// supports any particular filter.
    pub async fn probe_version(command: &str) -> Result<String, NormalizeError> {
        let output = Command::new(command)
            .arg("-version")
            .output()
            .await
            .map_err(|e| NormalizeError::MissingDependency(e.to_string()))?;

        if !output.status.success() {
            return Err(NormalizeError::MissingDependency(format!(
                "{} -version exited with {}",
                command, output.status
            )));
        }

        let banner = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string();
        debug!("Found {}: {}", command, banner);
        Ok(banner)
    }

    /// Get system information for debugging
    pub fn system_info() -> SystemInfo {
        SystemInfo {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
        }
    }
}

/// System information structure
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
}

impl std::fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.os, self.arch, self.family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_command() {
        let ffmpeg = PlatformCommands::get_command("ffmpeg");
        if cfg!(windows) {
            assert_eq!(ffmpeg, "ffmpeg.exe");
        } else {
            assert_eq!(ffmpeg, "ffmpeg");
        }
        assert_eq!(
            PlatformCommands::get_command("/opt/bin/ffmpeg"),
            "/opt/bin/ffmpeg"
        );
    }

    #[tokio::test]
    async fn test_probe_missing_tool() {
        let result = PlatformCommands::probe_version("definitely-not-an-installed-ffmpeg").await;
        assert!(matches!(result, Err(NormalizeError::MissingDependency(_))));
    }

    #[test]
    fn test_system_info() {
        let info = PlatformCommands::system_info();
        assert!(!info.os.is_empty());
        assert!(!info.arch.is_empty());
        assert!(!info.family.is_empty());
    }
}
