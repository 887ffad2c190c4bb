#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use confcheck::MemorySource;

/// A config that passes every audit rule, as `(section, [(option, value)])`.
const BASELINE: &[(&str, &[(&str, &str)])] = &[
    ("general", &[("TAG", "abaco/core:dev")]),
    ("logs", &[("level", "DEBUG")]),
    ("store", &[("mongo_host", "mongo"), ("mongo_port", "27017")]),
    ("rabbit", &[("uri", "amqp://rabbit:5672")]),
    (
        "spawner",
        &[
            ("host_id", "0"),
            ("host_queues", "default"),
            ("host_ip", "172.17.0.1"),
            ("max_workers_per_host", "75"),
            ("max_workers_per_actor", "6"),
        ],
    ),
    ("docker", &[("dd", "unix://var/run/docker.sock")]),
    (
        "workers",
        &[
            ("init_count", "1"),
            ("max_run_time", "-1"),
            ("max_cpus", "1000000000"),
            ("worker_ttl", "86400"),
            ("auto_remove", "true"),
            ("generate_clients", "False"),
            ("leave_containers", "False"),
            ("use_tas_uid", "False"),
            ("socket_host_path_dir", "/host/path/to/sockets"),
            ("fifo_host_path_dir", "/host/path/to/fifos"),
        ],
    ),
    (
        "web",
        &[
            ("access_control", "none"),
            ("tenant_name", "dev_staging"),
            ("accept_nonce", "True"),
            ("show_traceback", "false"),
            ("log_ex", "43200"),
            ("case", "camel"),
            ("max_content_length", "500000000"),
            ("all_queues", "default, special"),
        ],
    ),
];

/// Builder for service configs, starting from a known-good baseline.
#[derive(Debug, Clone)]
pub struct ServiceConfigBuilder {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl ServiceConfigBuilder {
    /// Every audit rule passes on the unmodified baseline.
    pub fn valid() -> Self {
        let sections = BASELINE
            .iter()
            .map(|(section, options)| {
                let options = options
                    .iter()
                    .map(|(o, v)| (o.to_string(), v.to_string()))
                    .collect();
                (section.to_string(), options)
            })
            .collect();
        Self { sections }
    }

    /// Start from nothing at all.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn set(mut self, section: &str, option: &str, value: &str) -> Self {
        let options = match self.sections.iter().position(|(s, _)| s == section) {
            Some(idx) => &mut self.sections[idx].1,
            None => {
                self.sections.push((section.to_string(), Vec::new()));
                &mut self.sections.last_mut().expect("just pushed").1
            }
        };

        match options.iter_mut().find(|(o, _)| o == option) {
            Some(entry) => entry.1 = value.to_string(),
            None => options.push((option.to_string(), value.to_string())),
        }
        self
    }

    pub fn unset(mut self, section: &str, option: &str) -> Self {
        if let Some((_, options)) = self.sections.iter_mut().find(|(s, _)| s == section) {
            options.retain(|(o, _)| o != option);
        }
        self
    }

    pub fn without_section(mut self, section: &str) -> Self {
        self.sections.retain(|(s, _)| s != section);
        self
    }

    pub fn build(&self) -> MemorySource {
        let mut src = MemorySource::new();
        for (section, options) in &self.sections {
            src.add_section(section);
            for (option, value) in options {
                src.set(section, option, value);
            }
        }
        src
    }

    /// Render as an INI document the file loader accepts.
    pub fn to_ini(&self) -> String {
        let mut text = String::new();
        for (section, options) in &self.sections {
            let _ = writeln!(text, "[{section}]");
            for (option, value) in options {
                let _ = writeln!(text, "{option}: {value}");
            }
            text.push('\n');
        }
        text
    }

    /// Render as a TOML document.
    ///
    /// `"true"` / `"false"` become TOML booleans; everything else is a quoted
    /// string. Option names are quoted so dotted names stay flat.
    pub fn to_toml(&self) -> String {
        let mut text = String::new();
        for (section, options) in &self.sections {
            let _ = writeln!(text, "[{section}]");
            for (option, value) in options {
                match value.as_str() {
                    "true" | "false" => {
                        let _ = writeln!(text, "{option:?} = {value}");
                    }
                    _ => {
                        let _ = writeln!(text, "{option:?} = {value:?}");
                    }
                }
            }
            text.push('\n');
        }
        text
    }

    /// Write [`to_ini`](Self::to_ini) to `path`.
    pub fn write_ini(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_ini()).with_context(|| format!("writing {:?}", path))
    }
}
