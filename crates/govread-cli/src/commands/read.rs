//! Read command implementation
//!
//! Audits one transaction and reports whether it carries fatal anomalies.

use crate::cli::OutputFormat;
use crate::config::AuditConfig;
use crate::formatters::{format_report, load_transaction, write_output};
use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

/// Execute read command, returning whether the report has a fatal anomaly
pub async fn cmd_read(
    config_path: &Path,
    chain: &str,
    tx_source: &str,
    format: &OutputFormat,
    output: Option<&Path>,
) -> Result<bool> {
    info!("Reading transaction on {} with config {}", chain, config_path.display());

    let config = AuditConfig::load(config_path)?;
    if !config.chains.contains_key(chain) {
        bail!("Chain {} is not configured", chain);
    }

    let tx = load_transaction(tx_source)?;
    let reader = config.reader()?;
    let report = reader.audit(chain, &tx).await;

    write_output(&format_report(&report, format)?, output)?;

    let fatal = report.has_fatal();
    info!(
        anomalies = report.anomalies.len(),
        fatal, "Audit complete"
    );
    Ok(fatal)
}
