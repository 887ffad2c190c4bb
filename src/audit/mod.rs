// src/audit/mod.rs

//! The validation engine.
//!
//! - `rule.rs`: rule primitives and their evaluation.
//! - `schema.rs`: the fixed, ordered section/rule table.
//! - `engine.rs`: fail-fast orchestration plus the collect-everything mode.

pub mod engine;
pub mod rule;
pub mod schema;

pub use engine::{
    check_section, collect_all_violations, run_all_checks, AuditReport, AuditState, Auditor,
};
pub use rule::{tokens, Rule};
pub use schema::{Schema, SectionSchema, SERVICE_SCHEMA};
