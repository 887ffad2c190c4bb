// src/audit/schema.rs

//! The audit schema: which sections are checked, in which order, with which
//! rules. Editing a check means editing the tables below; the engine never
//! needs to change.

use super::rule::Rule;

/// Rules for one section, evaluated top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSchema {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

/// Ordered list of sections. The order decides which violation is
/// reported first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    sections: &'static [SectionSchema],
}

impl Schema {
    pub const fn new(sections: &'static [SectionSchema]) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &'static [SectionSchema] {
        self.sections
    }

    pub fn section(&self, name: &str) -> Option<&'static SectionSchema> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn rules(&self) -> impl Iterator<Item = &'static Rule> {
        self.sections.iter().flat_map(|s| s.rules.iter())
    }

    pub fn rule_count(&self) -> usize {
        self.sections.iter().map(|s| s.rules.len()).sum()
    }
}

const ERROR_OR_DEBUG: &[&str] = &["ERROR", "DEBUG"];
// Case differs per option; do not merge these.
const LOWER_BOOL: &[&str] = &["true", "false"];
const TITLE_BOOL: &[&str] = &["True", "False"];

const GENERAL: &[Rule] = &[Rule::required("general", "TAG")];

const LOGS: &[Rule] = &[
    Rule::required("logs", "level"),
    Rule::one_of("logs", "level", ERROR_OR_DEBUG),
    Rule::one_of("logs", "level.worker", ERROR_OR_DEBUG),
    Rule::one_of("logs", "level.docker_util", ERROR_OR_DEBUG),
    Rule::one_of("logs", "level.spawner", ERROR_OR_DEBUG),
    Rule::one_of("logs", "level.controllers", ERROR_OR_DEBUG),
];

const STORE: &[Rule] = &[
    Rule::required("store", "mongo_host"),
    Rule::required("store", "mongo_port"),
    Rule::paired("store", "mongo_user", "mongo_password"),
];

const RABBIT: &[Rule] = &[Rule::required("rabbit", "uri")];

const SPAWNER: &[Rule] = &[
    Rule::required("spawner", "host_id"),
    Rule::required("spawner", "host_queues"),
    Rule::required("spawner", "host_ip"),
    Rule::required("spawner", "max_workers_per_host"),
    Rule::required("spawner", "max_workers_per_actor"),
];

const DOCKER: &[Rule] = &[Rule::required("docker", "dd")];

const WORKERS: &[Rule] = &[
    Rule::required("workers", "init_count"),
    Rule::required("workers", "max_run_time"),
    Rule::required("workers", "max_cpus"),
    Rule::required("workers", "worker_ttl"),
    Rule::required("workers", "auto_remove"),
    Rule::required("workers", "generate_clients"),
    Rule::required("workers", "leave_containers"),
    Rule::required("workers", "use_tas_uid"),
    Rule::required("workers", "socket_host_path_dir"),
    Rule::required("workers", "fifo_host_path_dir"),
    Rule::one_of("workers", "auto_remove", LOWER_BOOL),
    Rule::one_of("workers", "generate_clients", TITLE_BOOL),
    Rule::one_of("workers", "leave_containers", TITLE_BOOL),
    Rule::one_of("workers", "use_tas_uid", TITLE_BOOL),
];

const WEB: &[Rule] = &[
    Rule::required("web", "access_control"),
    Rule::required("web", "show_traceback"),
    Rule::required("web", "log_ex"),
    Rule::required("web", "case"),
    Rule::required("web", "max_content_length"),
    Rule::required("web", "all_queues"),
    Rule::one_of("web", "access_control", &["jwt", "none"]),
    Rule::required_if("web", "access_control", "jwt", "apim_public_key"),
    Rule::required_if("web", "access_control", "none", "accept_nonce"),
    Rule::required_if("web", "access_control", "none", "tenant_name"),
    Rule::one_of("web", "accept_nonce", TITLE_BOOL),
    Rule::one_of("web", "case", &["camel", "snake"]),
    Rule::one_of("web", "show_traceback", LOWER_BOOL),
    // Positional: relies on spawner having been audited already.
    Rule::subset("spawner", "host_queues", "web", "all_queues"),
];

/// The schema audited before the actor service starts.
pub static SERVICE_SCHEMA: Schema = Schema::new(&[
    SectionSchema { name: "general", rules: GENERAL },
    SectionSchema { name: "logs", rules: LOGS },
    SectionSchema { name: "store", rules: STORE },
    SectionSchema { name: "rabbit", rules: RABBIT },
    SectionSchema { name: "spawner", rules: SPAWNER },
    SectionSchema { name: "docker", rules: DOCKER },
    SectionSchema { name: "workers", rules: WORKERS },
    SectionSchema { name: "web", rules: WEB },
]);
