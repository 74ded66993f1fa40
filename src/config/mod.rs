mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";
pub const DEFAULT_DB: &str = "sparkifydb.sqlite";

/// Command line values taking part in config resolution.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db: PathBuf,
    pub duration_tolerance: Option<f64>,
    pub reset: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            song_data: PathBuf::from(DEFAULT_SONG_DATA),
            log_data: PathBuf::from(DEFAULT_LOG_DATA),
            db: PathBuf::from(DEFAULT_DB),
            duration_tolerance: None,
            reset: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub db_path: PathBuf,
    /// Maximum duration difference, in seconds, accepted when resolving songplays.
    /// `None` requires an exact match.
    pub duration_tolerance: Option<f64>,
    /// Drop and recreate the warehouse tables before loading.
    pub reset: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let song_data = file
            .song_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data.clone());
        let log_data = file
            .log_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data.clone());
        let db_path = file
            .db
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db.clone());

        let duration_tolerance = file.duration_tolerance.or(cli.duration_tolerance);
        if let Some(tolerance) = duration_tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                bail!(
                    "duration_tolerance must be a non-negative number of seconds, got {}",
                    tolerance
                );
            }
        }

        if db_path.is_dir() {
            bail!("Database path is a directory: {:?}", db_path);
        }

        Ok(Self {
            song_data,
            log_data,
            db_path,
            duration_tolerance,
            reset: cli.reset,
        })
    }
}
