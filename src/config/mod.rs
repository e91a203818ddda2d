//! Configuration management
//!
//! Values come from the command line, optionally layered over a TOML file.
//! A `Config` only exists once it has been validated.

use crate::types::SyncError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "foldsync", version, about = "One-way periodic folder mirroring")]
pub struct Cli {
    /// Folder to mirror from
    #[arg(long, alias = "source_folder", value_name = "PATH")]
    pub source_folder: Option<PathBuf>,

    /// Folder to mirror into (created if missing)
    #[arg(long, alias = "replica_folder", value_name = "PATH")]
    pub replica_folder: Option<PathBuf>,

    /// Seconds to wait between runs
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Folder for rotated log files
    #[arg(long, alias = "log_folder", value_name = "PATH")]
    pub log_folder: Option<PathBuf>,

    /// TOML file with the same keys; command line values win
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,
}

/// Contents of a `--config` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source_folder: Option<PathBuf>,
    pub replica_folder: Option<PathBuf>,
    pub interval: Option<u64>,
    pub log_folder: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
            .map_err(|e| SyncError::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub interval: Duration,
    pub log_folder: PathBuf,
    pub once: bool,
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }
}

impl Config {
    /// Layer command line values over file values, then validate
    pub fn merge(cli: Cli, file: FileConfig) -> Result<Self, SyncError> {
        let source = required(cli.source_folder.or(file.source_folder), "source_folder")?;
        let replica = required(cli.replica_folder.or(file.replica_folder), "replica_folder")?;
        let interval = required(cli.interval.or(file.interval), "interval")?;
        let log_folder = required(cli.log_folder.or(file.log_folder), "log_folder")?;

        let config = Self {
            source,
            replica,
            interval: Duration::from_secs(interval),
            log_folder,
            once: cli.once,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        let metadata = fs::metadata(&self.source).map_err(|_| {
            SyncError::Config(format!(
                "Source path does not exist: {}",
                self.source.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(SyncError::Config(format!(
                "Source path is not a directory: {}",
                self.source.display()
            )));
        }

        if self.interval.is_zero() {
            return Err(SyncError::Config(
                "Interval must be at least 1 second".to_string(),
            ));
        }

        let source = resolve(&self.source)?;
        let replica = resolve(&self.replica)?;
        if source == replica {
            return Err(SyncError::Config(
                "Source and replica cannot be the same".to_string(),
            ));
        }
        if replica.starts_with(&source) || source.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Source and replica cannot be nested: {} / {}",
                source.display(),
                replica.display()
            )));
        }

        // Logs inside the replica would be deleted as extra files every run.
        if resolve(&self.log_folder)?.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Log folder cannot be inside the replica: {}",
                self.log_folder.display()
            )));
        }

        Ok(())
    }

    /// True when log files will be mirrored along with the source
    pub fn log_folder_in_source(&self) -> bool {
        match (resolve(&self.log_folder), resolve(&self.source)) {
            (Ok(log_folder), Ok(source)) => log_folder.starts_with(source),
            _ => false,
        }
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, SyncError> {
    value.ok_or_else(|| SyncError::Config(format!("Missing required option: {}", name)))
}

// Replica may not exist yet, so fall back to a lexical absolute path.
fn resolve(path: &Path) -> Result<PathBuf, SyncError> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(_) => std::path::absolute(path).map_err(|e| SyncError::from_io(path, e)),
    }
}
