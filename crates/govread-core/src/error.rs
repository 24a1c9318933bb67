//! Error types for govread-core
//!
//! This module defines the error conditions that can abort a single decode
//! attempt. Semantic mismatches are never errors: they are recorded as
//! anomalies and reflected in the returned call tree instead.

use crate::types::Domain;
use thiserror::Error;

/// Errors raised while classifying, decoding or validating a transaction
///
/// Every variant is caught at the nearest recursive `read` boundary and turned
/// into an `Unknown` node plus a fatal anomaly, so a single bad sub-call never
/// aborts the audit of a larger batch.
#[derive(Error, Debug)]
pub enum GovernError {
    /// A governance call arrived without call data
    #[error("No data in {0} transaction")]
    MissingPayload(&'static str),

    /// The batch-wrapper payload does not follow the packed MultiSend encoding
    #[error("Malformed batch data: {0}")]
    MalformedBatchData(String),

    /// ABI decoding of call data failed
    #[error("ABI decoding failed: {0}")]
    AbiDecode(String),

    /// No chain is registered for a numeric domain
    #[error("No chain registered for domain {0}")]
    UnknownDomain(Domain),

    /// A chain name is absent from the chain directory
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    /// A contract address required for a check is missing from the directory
    #[error("No {contract} address registered for chain {chain}")]
    MissingAddress {
        /// Chain that was queried
        chain: String,
        /// Contract that was looked up
        contract: String,
    },

    /// No statically configured security module exists for the chain
    #[error("No expected security module configured for chain {0}")]
    MissingExpectedConfig(String),

    /// Deriving a live security-module config failed permanently
    #[error("Security module derivation failed: {0}")]
    Derivation(String),

    /// External collaborator failure, eligible for retry
    #[error("External lookup failed: {0}")]
    External(String),

    /// External collaborator did not answer in time, eligible for retry
    #[error("{0} timed out")]
    Timeout(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GovernError {
    /// Create an external lookup error from any error type
    pub fn external<E: std::fmt::Display>(error: E) -> Self {
        Self::External(error.to_string())
    }

    /// Create an ABI decoding error from any error type
    pub fn abi<E: std::fmt::Display>(error: E) -> Self {
        Self::AbiDecode(error.to_string())
    }

    /// Whether a retry of the failed operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::External(_) | Self::Timeout(_))
    }
}

/// Result type alias for govread operations
pub type Result<T> = std::result::Result<T, GovernError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GovernError::external("connection reset").is_transient());
        assert!(GovernError::Timeout("multisend lookup".into()).is_transient());
        assert!(!GovernError::MissingPayload("ICA").is_transient());
        assert!(!GovernError::UnknownDomain(137).is_transient());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GovernError::MissingPayload("mailbox").to_string(),
            "No data in mailbox transaction"
        );
        let missing = GovernError::MissingAddress {
            chain: "polygon".into(),
            contract: "mailbox".into(),
        };
        assert_eq!(
            missing.to_string(),
            "No mailbox address registered for chain polygon"
        );
    }
}
