// src/lib.rs

pub mod audit;
pub mod cli;
pub mod errors;
pub mod logging;
pub mod source;

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::audit::{collect_all_violations, run_all_checks, Schema, SERVICE_SCHEMA};
use crate::cli::CliArgs;
use crate::errors::ConfcheckError;
use crate::source::{default_config_path, load_from_path};

pub use crate::audit::{AuditReport, Auditor, Rule};
pub use crate::errors::ValidationError;
pub use crate::source::{ConfigSource, IniSource, MemorySource, TomlSource};

/// Line printed on stdout when the audit passes.
pub const PASSED_MESSAGE: &str = "Config checks passed.";

/// High-level entry point used by `main.rs`; the verdict goes to stdout.
pub fn run(args: &CliArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_to(args, &mut out)
}

/// Same as [`run`], writing the verdict to `out`.
///
/// - `--list-rules`: print the schema, read nothing.
/// - default: load the config and stop at the first violation.
/// - `--all`: load the config and print every violation.
///
/// A violated rule comes back as an error wrapping
/// [`ConfcheckError::Validation`], so the process exits non-zero.
pub fn run_to(args: &CliArgs, out: &mut dyn Write) -> Result<()> {
    if args.list_rules {
        print_rules(&SERVICE_SCHEMA, out)?;
        return Ok(());
    }

    let path = args.config.clone().unwrap_or_else(default_config_path);
    let source = load_from_path(&path)
        .map_err(ConfcheckError::from)
        .with_context(|| format!("loading config from {:?}", path))?;
    debug!(?path, "config loaded");

    if args.all {
        let report = collect_all_violations(&source);
        return report_all(&report, out);
    }

    run_all_checks(&source).map_err(ConfcheckError::from)?;
    info!(?path, "audit passed");
    writeln!(out, "{PASSED_MESSAGE}")?;
    Ok(())
}

fn report_all(report: &AuditReport, out: &mut dyn Write) -> Result<()> {
    if report.is_clean() {
        writeln!(out, "{PASSED_MESSAGE}")?;
        return Ok(());
    }

    for violation in &report.violations {
        writeln!(out, "{violation}")?;
    }
    Err(anyhow!(
        "{} of {} config checks failed",
        report.violations.len(),
        report.rules_checked
    ))
}

/// Dry-run output: sections in evaluation order with their rules.
fn print_rules(schema: &Schema, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "confcheck rules ({}):", schema.rule_count())?;
    for section in schema.sections() {
        writeln!(out, "  [{}]", section.name)?;
        for rule in section.rules {
            writeln!(out, "      {rule}")?;
        }
    }
    Ok(())
}
