// src/source/ini.rs

//! INI-style config files, the format the actor service reads at startup:
//!
//! ```ini
//! [web]
//! access_control: jwt
//! all_queues = default, priority
//! ```
//!
//! Dialect notes:
//! - `:` or `=` separates option from value; the first one on the line wins.
//! - Option names are case-insensitive (`TAG` == `tag`); section names are not.
//! - `#` / `;` start a comment only at the beginning of a line.
//! - Lines indented deeper than their option continue its value (joined by
//!   `\n`).
//! - Values in `[DEFAULT]` are visible from every other section.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::trace;

use crate::errors::{LookupError, SourceError};
use crate::source::ConfigSource;

pub const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSource {
    defaults: BTreeMap<String, String>,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// The option a continuation line would extend.
struct OpenOption {
    section: String,
    option: String,
    indent: usize,
}

impl IniSource {
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let mut src = IniSource::default();
        let mut section: Option<String> = None;
        let mut open: Option<OpenOption> = None;
        let mut pending_blank_lines = 0usize;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                if open.is_some() {
                    pending_blank_lines += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();

            if let Some(cont) = open.as_ref().filter(|o| indent > o.indent) {
                let value = src
                    .table_mut(&cont.section)
                    .entry(cont.option.clone())
                    .or_default();
                for _ in 0..pending_blank_lines {
                    value.push('\n');
                }
                value.push('\n');
                value.push_str(trimmed);
                pending_blank_lines = 0;
                continue;
            }
            pending_blank_lines = 0;

            if trimmed.starts_with('[') {
                let name = parse_header(trimmed, line_no)?;
                if name != DEFAULT_SECTION && src.sections.contains_key(&name) {
                    return Err(SourceError::parse(
                        line_no,
                        format!("section '{name}' already exists"),
                    ));
                }
                src.table_mut(&name);
                trace!(section = %name, line = line_no, "ini section");
                section = Some(name);
                open = None;
                continue;
            }

            let Some(current) = section.as_ref() else {
                return Err(SourceError::parse(
                    line_no,
                    "option found before any [section] header",
                ));
            };

            let (option, value) = split_option(trimmed, line_no)?;
            let table = src.table_mut(current);
            if table.contains_key(&option) {
                return Err(SourceError::parse(
                    line_no,
                    format!("option '{option}' in section '{current}' already exists"),
                ));
            }
            table.insert(option.clone(), value);

            open = Some(OpenOption {
                section: current.clone(),
                option,
                indent,
            });
        }

        Ok(src)
    }

    /// Regular section names, in sorted order. `[DEFAULT]` is not listed.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    fn table_mut(&mut self, section: &str) -> &mut BTreeMap<String, String> {
        if section == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(section.to_string()).or_default()
        }
    }
}

impl FromStr for IniSource {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IniSource::parse(s)
    }
}

impl ConfigSource for IniSource {
    fn get(&self, section: &str, option: &str) -> Result<&str, LookupError> {
        let options = self
            .sections
            .get(section)
            .ok_or_else(|| LookupError::NoSection(section.to_string()))?;

        let key = option.to_lowercase();
        options
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
            .ok_or_else(|| LookupError::NoOption {
                section: section.to_string(),
                option: option.to_string(),
            })
    }
}

fn parse_header(line: &str, line_no: usize) -> Result<String, SourceError> {
    let name = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| SourceError::parse(line_no, format!("malformed section header {line:?}")))?;
    Ok(name.to_string())
}

fn split_option(line: &str, line_no: usize) -> Result<(String, String), SourceError> {
    let Some(pos) = line.find([':', '=']) else {
        return Err(SourceError::parse(
            line_no,
            format!("expected 'option: value' or 'option = value', got {line:?}"),
        ));
    };

    let option = line[..pos].trim();
    if option.is_empty() {
        return Err(SourceError::parse(line_no, "empty option name"));
    }

    Ok((option.to_lowercase(), line[pos + 1..].trim().to_string()))
}
