//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use remote_store_config::{ConfigChange, DocumentKey};
use remote_store_data::CommitSummary;
use serde::Serialize;

use crate::admin::{MigrationReport, RecordReport};
use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_check(reports: &[RecordReport], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(reports),
        OutputFormat::Table => {
            if reports.is_empty() {
                return Ok("no documents".to_string());
            }
            let mut out = String::new();
            for report in reports {
                if report.valid {
                    let _ = writeln!(out, "{}: ok", report.id);
                } else {
                    let issues = report.issues.join("; ");
                    let _ = writeln!(out, "{}: invalid - {issues}", report.id);
                }
                for warning in &report.warnings {
                    let _ = writeln!(out, "  warning: {warning}");
                }
            }
            Ok(out.trim_end().to_string())
        }
    }
}

pub(crate) fn render_migration(
    report: &MigrationReport,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Table => {
            let mut out = String::new();
            for (label, paths) in [
                ("deleted", &report.deleted),
                ("preserved", &report.preserved),
                ("created", &report.created),
            ] {
                for path in paths {
                    let _ = writeln!(out, "{label:<10} {path}");
                }
            }
            Ok(out.trim_end().to_string())
        }
    }
}

pub(crate) fn render_clean(summary: CommitSummary, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": summary.deleted })),
        OutputFormat::Table => Ok(format!("deleted {} document(s)", summary.deleted)),
    }
}

pub(crate) fn render_change(
    key: DocumentKey,
    change: &ConfigChange,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(change)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Table => {
            let getters = &change.getters;
            let mut line = format!(
                "{key} maintenance={} review={} update={}",
                getters.maintenance,
                getters.review_mode,
                getters.update_type.as_str()
            );
            match &change.record {
                None => line.push_str(" (no record)"),
                Some(record) => {
                    if let Some(reason) = &record.maintenance.reason {
                        let _ = write!(line, " reason={reason:?}");
                    }
                }
            }
            Ok(line)
        }
    }
}
