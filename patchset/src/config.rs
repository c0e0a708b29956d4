use std::io::Write;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Serialize as _;
use serde_json as json;
use thiserror::Error;

use crate::wip;

/// Environment variable pointing to a configuration file.
pub const PATCHSET_CONFIG: &str = "PATCHSET_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("configuration JSON error: {0}")]
    Json(#[from] json::Error),
}

/// Patch set sequencing configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Message tags that toggle work in progress.
    #[serde(default)]
    pub wip: wip::Markers,
}

impl Config {
    /// Load a configuration from the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg = json::from_reader(io::BufReader::new(fs::File::open(path)?))?;

        Ok(cfg)
    }

    /// Load the configuration from the given path, if any, or from the path
    /// in [`PATCHSET_CONFIG`], falling back to the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(PATCHSET_CONFIG).map(PathBuf::from));

        match path {
            Some(path) => {
                log::debug!(target: "patchset", "Loading configuration from {path:?}");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Write configuration to disk. Fails if the path already exists.
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)?;
        let formatter = json::ser::PrettyFormatter::with_indent(b"  ");
        let mut serializer = json::Serializer::with_formatter(&file, formatter);

        self.serialize(&mut serializer)?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        Ok(())
    }
}
