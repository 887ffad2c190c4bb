// src/audit/engine.rs

//! Orchestration: walk a [`Schema`] section by section and stop at the first
//! violated rule.
//!
//! ```text
//! NotStarted --run()--> Running --+--> Passed
//!                                 +--> Failed(ValidationError)
//! ```
//!
//! `Passed` and `Failed` are terminal. Calling [`Auditor::run`] again hands
//! back the recorded outcome without touching the source.

use tracing::{debug, error, info, warn};

use crate::audit::rule::Rule;
use crate::audit::schema::{Schema, SectionSchema, SERVICE_SCHEMA};
use crate::errors::ValidationError;
use crate::source::ConfigSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditState {
    NotStarted,
    Running,
    Passed,
    Failed(ValidationError),
}

impl AuditState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuditState::Passed | AuditState::Failed(_))
    }
}

/// One audit run of a schema against a config source.
#[derive(Debug)]
pub struct Auditor<'a> {
    schema: &'a Schema,
    source: &'a dyn ConfigSource,
    state: AuditState,
}

impl<'a> Auditor<'a> {
    pub fn new(schema: &'a Schema, source: &'a dyn ConfigSource) -> Self {
        Self {
            schema,
            source,
            state: AuditState::NotStarted,
        }
    }

    pub fn state(&self) -> &AuditState {
        &self.state
    }

    /// Fail-fast audit: the first violated rule ends the run.
    pub fn run(&mut self) -> Result<(), ValidationError> {
        match &self.state {
            AuditState::Passed => return Ok(()),
            AuditState::Failed(err) => return Err(err.clone()),
            AuditState::NotStarted | AuditState::Running => {}
        }

        self.state = AuditState::Running;
        let outcome = self
            .schema
            .sections()
            .iter()
            .try_for_each(|section| check_section(section, self.source));

        self.state = match &outcome {
            Ok(()) => {
                info!(rules = self.schema.rule_count(), "config checks passed");
                AuditState::Passed
            }
            Err(err) => {
                error!(section = %err.section, option = ?err.option, "{err}");
                AuditState::Failed(err.clone())
            }
        };

        outcome
    }

    /// Evaluate every rule and gather all violations, in schema order.
    ///
    /// This does not move the fail-fast state machine.
    pub fn run_collect(&self) -> AuditReport {
        let mut report = AuditReport::default();

        for section in self.schema.sections() {
            debug!(section = section.name, "collecting violations");
            for rule in section.rules {
                report.rules_checked += 1;
                if let Err(err) = rule.evaluate(self.source) {
                    warn!(section = %err.section, option = ?err.option, "{err}");
                    report.violations.push(err);
                }
            }
        }

        report
    }
}

/// Run one section's rules in order, stopping at the first failure.
pub fn check_section(
    section: &SectionSchema,
    source: &dyn ConfigSource,
) -> Result<(), ValidationError> {
    debug!(section = section.name, rules = section.rules.len(), "checking section");
    section.rules.iter().try_for_each(|rule| check_rule(rule, source))
}

fn check_rule(rule: &Rule, source: &dyn ConfigSource) -> Result<(), ValidationError> {
    let outcome = rule.evaluate(source);
    debug!(%rule, ok = outcome.is_ok(), "rule evaluated");
    outcome
}

/// Outcome of [`Auditor::run_collect`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub violations: Vec<ValidationError>,
    pub rules_checked: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violation fail-fast mode would have reported.
    pub fn first(&self) -> Option<&ValidationError> {
        self.violations.first()
    }

    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

/// Audit `source` against [`SERVICE_SCHEMA`], failing on the first violation.
///
/// This is what the service's startup sequence calls before binding any
/// listener.
pub fn run_all_checks(source: &dyn ConfigSource) -> Result<(), ValidationError> {
    Auditor::new(&SERVICE_SCHEMA, source).run()
}

/// Audit `source` against [`SERVICE_SCHEMA`] and report every violation.
pub fn collect_all_violations(source: &dyn ConfigSource) -> AuditReport {
    Auditor::new(&SERVICE_SCHEMA, source).run_collect()
}
