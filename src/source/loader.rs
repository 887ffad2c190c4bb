// src/source/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{LookupError, SourceError};
use crate::source::{ConfigSource, IniSource, TomlSource};

/// Environment variable consulted by [`default_config_path`].
pub const CONFIG_PATH_ENV: &str = "CONFCHECK_CONF";

/// Name of the config file the service reads when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = "service.conf";

/// A config source backed by a file on disk, in either supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Ini(IniSource),
    Toml(TomlSource),
}

impl ConfigSource for FileSource {
    fn get(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        match self {
            FileSource::Ini(src) => src.get(section, option),
            FileSource::Toml(src) => src.get(section, option),
        }
    }
}

/// Read a config file and parse it into a [`FileSource`].
///
/// Files ending in `.toml` are read as TOML; anything else (`.conf`, `.ini`,
/// no extension) is read as INI. This only parses the file; it does not run
/// any audit rules.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<FileSource, SourceError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    debug!(?path, format = if is_toml { "toml" } else { "ini" }, "loading config");

    if is_toml {
        Ok(FileSource::Toml(TomlSource::parse(&contents)?))
    } else {
        Ok(FileSource::Ini(IniSource::parse(&contents)?))
    }
}

/// Resolve the config path to audit when none was given on the command line.
///
/// `CONFCHECK_CONF` wins if set and non-empty; otherwise `service.conf` in
/// the current working directory.
pub fn default_config_path() -> PathBuf {
    resolve_config_path(std::env::var(CONFIG_PATH_ENV).ok())
}

fn resolve_config_path(from_env: Option<String>) -> PathBuf {
    match from_env {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}
