//! Output formatting and input loading utilities
//!
//! This module renders audit reports as an indented tree or JSON, and handles
//! reading transactions and writing output to files or stdout.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use govread_core::{
    AnomalyRecord, CoreMessagingArgs, DecodedArg, DecodedCall, RemoteAccountArgs, Severity,
    Transaction,
};
use govread_ethereum::{AuditReport, MultiSendItem};
use serde::Serialize;
use std::fmt::Write;
use std::io::Read;
use std::path::Path;

/// Helper function to write output to file or stdout
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    if let Some(path) = output_path {
        std::fs::write(path, content)?;
        eprintln!("Output written to {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Load a transaction from a JSON file, or stdin for `-`
pub fn load_transaction(source: &str) -> Result<Transaction> {
    let content = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read transaction {}", source))?
    };
    Ok(serde_json::from_str(&content)?)
}

/// Render a report in the requested format
pub fn format_report(report: &AuditReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report).map_err(Into::into),
        OutputFormat::Pretty => {
            let mut out = String::new();
            render_call(&mut out, &report.call, 0)?;
            render_anomalies(&mut out, &report.anomalies)?;
            Ok(out)
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn render_args(out: &mut String, args: &[DecodedArg], depth: usize) -> std::fmt::Result {
    for arg in args {
        writeln!(out, "{}{} ({}): {}", indent(depth), arg.name, arg.kind, arg.value)?;
    }
    Ok(())
}

fn render_call(out: &mut String, call: &DecodedCall, depth: usize) -> std::fmt::Result {
    let pad = indent(depth);
    match call {
        DecodedCall::RemoteAccountCall(call) => {
            writeln!(out, "{}{} {} [{}]", pad, call.to, call.signature, call.value)?;
            match &call.args {
                RemoteAccountArgs::Raw(args) => render_args(out, args, depth + 1)?,
                RemoteAccountArgs::RouterEnrollments(enrollments) => {
                    for enrollment in enrollments {
                        writeln!(
                            out,
                            "{}  domain {} ({}): {} {}",
                            pad,
                            enrollment.domain,
                            enrollment.chain.as_deref().unwrap_or("unknown"),
                            enrollment.insight.subject,
                            enrollment.insight
                        )?;
                    }
                }
                RemoteAccountArgs::RemoteCall(remote) => {
                    writeln!(
                        out,
                        "{}  destination: {} ({})",
                        pad, remote.destination.chain, remote.destination.domain
                    )?;
                    writeln!(out, "{}  router: {} {}", pad, remote.router.subject, remote.router)?;
                    writeln!(out, "{}  ism: {} {}", pad, remote.ism.subject, remote.ism)?;
                    writeln!(
                        out,
                        "{}  ica: {} {}",
                        pad, remote.destination_ica.subject, remote.destination_ica
                    )?;
                    writeln!(out, "{}  calls:", pad)?;
                    for nested in &remote.calls {
                        render_call(out, nested, depth + 2)?;
                    }
                }
            }
        }
        DecodedCall::CoreMessagingCall(call) => {
            writeln!(out, "{}{} {} [{}]", pad, call.to, call.signature, call.value)?;
            match &call.args {
                CoreMessagingArgs::Raw(args) => render_args(out, args, depth + 1)?,
                CoreMessagingArgs::SetDefaultIsm(ism) => {
                    writeln!(out, "{}  module: {} {}", pad, ism.module, ism.insight)?;
                }
            }
        }
        DecodedCall::BatchCall(batch) => {
            writeln!(out, "{}{} ({} entries)", pad, batch.to, batch.multisends.len())?;
            for entry in &batch.multisends {
                writeln!(
                    out,
                    "{}  #{} {} [{}]",
                    pad, entry.index, entry.operation, entry.value
                )?;
                render_call(out, &entry.decoded, depth + 2)?;
            }
        }
        DecodedCall::Unknown(unknown) => {
            let to = unknown
                .transaction
                .to
                .map(|to| to.to_string())
                .unwrap_or_else(|| "no target".to_string());
            writeln!(out, "{}{} on {}: {}", pad, to, unknown.chain, unknown.insight)?;
        }
    }
    Ok(())
}

fn render_anomalies(out: &mut String, anomalies: &[AnomalyRecord]) -> std::fmt::Result {
    if anomalies.is_empty() {
        return writeln!(out, "\nNo anomalies");
    }
    writeln!(out, "\nAnomalies ({}):", anomalies.len())?;
    for anomaly in anomalies {
        let severity = match anomaly.severity {
            Severity::Fatal => "fatal",
            Severity::Warning => "warning",
        };
        write!(out, "  [{}] {}: {}", severity, anomaly.chain, anomaly.description)?;
        if let Some(remote) = &anomaly.remote {
            write!(
                out,
                " (remote {} {})",
                remote.domain,
                remote.chain.as_deref().unwrap_or("unknown")
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// JSON view of a decoded batch entry
#[derive(Serialize)]
pub struct BatchEntryView {
    pub index: usize,
    pub operation: String,
    pub to: String,
    pub value: String,
    pub data: String,
}

/// Render decoded batch entries in the requested format
pub fn format_batch(items: &[MultiSendItem], format: &OutputFormat) -> Result<String> {
    let views: Vec<BatchEntryView> = items
        .iter()
        .enumerate()
        .map(|(index, item)| BatchEntryView {
            index,
            operation: item.operation.to_string(),
            to: item.to.to_string(),
            value: item.value.to_string(),
            data: format!("0x{}", hex::encode(&item.data)),
        })
        .collect();

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&views).map_err(Into::into),
        OutputFormat::Pretty => {
            let mut out = String::new();
            writeln!(out, "{} entries", views.len())?;
            for view in &views {
                writeln!(
                    out,
                    "  #{} {} to {} value {} data {}",
                    view.index, view.operation, view.to, view.value, view.data
                )?;
            }
            Ok(out)
        }
    }
}
