//! Append-only log of findings accumulated during one audit
//!
//! The log is shared by every branch of a recursive read, including branches
//! decoded concurrently, so appends go through a mutex. Appending is the only
//! mutation until the caller drains the log.

use crate::types::{ChainName, Domain, Transaction};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Needs a human look but does not by itself block approval
    Warning,
    /// The transaction must not be approved as-is
    Fatal,
}

/// The remote side of a cross-chain finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteContext {
    pub domain: Domain,
    pub chain: Option<ChainName>,
}

/// What the finding is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Offending {
    /// A whole transaction
    Transaction { transaction: Transaction },
    /// A single decoded field
    Field {
        field: String,
        actual: String,
        expected: Option<String>,
    },
    /// A security module whose derived config differs from the expected one
    ModuleConfig {
        module: Address,
        derived: Value,
        expected: Value,
    },
    /// A decode that failed outright
    Error {
        transaction: Transaction,
        message: String,
    },
}

/// One structured finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    /// Chain the offending call executes on
    pub chain: ChainName,
    pub severity: Severity,
    pub offending: Offending,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteContext>,
    pub description: String,
}

impl AnomalyRecord {
    /// A finding that blocks approval
    pub fn fatal(chain: &str, offending: Offending, description: impl Into<String>) -> Self {
        Self {
            chain: chain.to_string(),
            severity: Severity::Fatal,
            offending,
            remote: None,
            description: description.into(),
        }
    }

    /// A finding that only needs review
    pub fn warning(chain: &str, offending: Offending, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::fatal(chain, offending, description)
        }
    }

    /// Attach the remote domain and chain
    pub fn with_remote(mut self, domain: Domain, chain: Option<&str>) -> Self {
        self.remote = Some(RemoteContext {
            domain,
            chain: chain.map(str::to_string),
        });
        self
    }
}

/// Thread-safe append-only anomaly collection
#[derive(Debug, Default)]
pub struct AnomalyLog {
    records: Mutex<Vec<AnomalyRecord>>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AnomalyRecord>> {
        // A panicking appender cannot leave a half-written Vec behind.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one record
    pub fn push(&self, record: AnomalyRecord) {
        tracing::warn!(
            chain = %record.chain,
            severity = ?record.severity,
            "{}",
            record.description
        );
        self.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether any fatal record has been appended
    pub fn has_fatal(&self) -> bool {
        self.lock().iter().any(|r| r.severity == Severity::Fatal)
    }

    /// Copy of the records appended so far
    pub fn snapshot(&self) -> Vec<AnomalyRecord> {
        self.lock().clone()
    }

    /// Take all records, leaving the log empty
    pub fn drain(&self) -> Vec<AnomalyRecord> {
        std::mem::take(&mut *self.lock())
    }
}
