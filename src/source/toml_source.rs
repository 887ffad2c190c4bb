// src/source/toml_source.rs

//! The same section/option model, read from TOML:
//!
//! ```toml
//! [workers]
//! init_count = 1
//! auto_remove = "true"
//!
//! [web]
//! all_queues = ["default", "priority"]
//! ```
//!
//! Every top-level table is a section. Values are flattened to the string
//! form the auditor compares against: strings verbatim, numbers and booleans
//! via `Display`, arrays of scalars comma-joined. Nested tables are rejected.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{LookupError, SourceError};
use crate::source::ConfigSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TomlSource {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// Raw document shape: `[section]` tables of scalar-ish values.
type RawDocument = BTreeMap<String, BTreeMap<String, RawValue>>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    List(Vec<RawValue>),
}

impl RawValue {
    fn render(&self) -> Result<String, String> {
        match self {
            RawValue::String(s) => Ok(s.clone()),
            RawValue::Bool(b) => Ok(b.to_string()),
            RawValue::Integer(i) => Ok(i.to_string()),
            RawValue::Float(f) => Ok(f.to_string()),
            RawValue::List(items) => {
                let rendered = items
                    .iter()
                    .map(|item| match item {
                        RawValue::List(_) => Err("nested arrays are not supported".to_string()),
                        scalar => scalar.render(),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rendered.join(","))
            }
        }
    }
}

impl TomlSource {
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let raw: RawDocument = toml::from_str(text)?;

        let mut sections = BTreeMap::new();
        for (section, options) in raw {
            let mut flat = BTreeMap::new();
            for (option, value) in options {
                let rendered =
                    value
                        .render()
                        .map_err(|reason| SourceError::UnsupportedValue {
                            section: section.clone(),
                            option: option.clone(),
                            reason,
                        })?;
                flat.insert(option, rendered);
            }
            sections.insert(section, flat);
        }

        Ok(Self { sections })
    }
}

impl FromStr for TomlSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TomlSource::parse(s)
    }
}

impl ConfigSource for TomlSource {
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
