// src/source/mod.rs

//! The key/value lookup abstraction the auditor reads from.
//!
//! The auditor only ever calls [`ConfigSource::get`] and
//! [`ConfigSource::exists`]; how the values got there (INI file, TOML file,
//! in-memory fixture) is up to the adapter.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::errors::LookupError;

pub mod ini;
pub mod loader;
pub mod toml_source;

pub use ini::IniSource;
pub use loader::{default_config_path, load_from_path, FileSource};
pub use toml_source::TomlSource;

/// Read-only `(section, option) -> value` lookup.
pub trait ConfigSource: Debug {
    /// Return the raw string value, or the reason it is missing.
    ///
    /// No coercion happens here: `"true"` and `"True"` are different values.
    fn get(&self, section: &str, option: &str) -> Result<&str, LookupError>;

    /// `true` when [`get`](Self::get) would return a value.
    fn exists(&self, section: &str, option: &str) -> bool {
        self.get(section, option).is_ok()
    }
}

/// Plain in-memory source, mostly for fixtures.
///
/// Section and option names are stored exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, section: &str, option: &str, value: &str) -> Self {
        self.set(section, option, value);
        self
    }

    pub fn set(&mut self, section: &str, option: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), value.to_string());
    }

    /// Remove an option; the section itself stays, even if now empty.
    pub fn remove(&mut self, section: &str, option: &str) -> Option<String> {
        self.sections.get_mut(section)?.remove(option)
    }

    pub fn add_section(&mut self, section: &str) {
        self.sections.entry(section.to_string()).or_default();
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

impl ConfigSource for MemorySource {
    fn get(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        let options = self
            .sections
            .get(section)
            .ok_or_else(|| LookupError::NoSection(section.to_string()))?;

        options
            .get(option)
            .map(String::as_str)
            .ok_or_else(|| LookupError::NoOption {
                section: section.to_string(),
                option: option.to_string(),
            })
    }
}
