//! Recursive governance transaction reader
//!
//! [`GovernTransactionReader`] holds everything that is fixed across audits:
//! collaborators, the governance owner and the parsed method tables. Each audit
//! runs inside an [`AuditSession`], which owns the anomaly log and the
//! per-session caches shared by every recursive branch.

use crate::alloy::Address;
use crate::methods::Interfaces;
use crate::multisend::{decode_multisend, MultiSendItem};
use futures::future::{join_all, BoxFuture, FutureExt};
use govread_core::{
    format_native, AnomalyLog, AnomalyRecord, BatchCall, ChainName, Classification, Collaborators,
    DecodedCall, DerivationTracker, GovernError, MultiSendEntry, MultisendCache, Offending,
    Result, RetryPolicy, Severity, Transaction, UnknownCall,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const UNKNOWN_INSIGHT: &str = "⚠️ Unknown transaction type";

/// Account that owns governance on its home chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceOwner {
    pub chain: ChainName,
    pub address: Address,
}

/// Settings fixed for the lifetime of a reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Owner of every interchain account a remote call may use
    pub owner: GovernanceOwner,
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Result of a complete audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub call: DecodedCall,
    pub anomalies: Vec<AnomalyRecord>,
}

impl AuditReport {
    /// Whether the audited transaction must not be approved
    pub fn has_fatal(&self) -> bool {
        self.anomalies
            .iter()
            .any(|a| a.severity == Severity::Fatal)
    }
}

/// Classifies, decodes and validates governance transactions
pub struct GovernTransactionReader {
    pub(crate) collaborators: Collaborators,
    pub(crate) config: ReaderConfig,
    pub(crate) interfaces: Interfaces,
}

impl GovernTransactionReader {
    pub fn new(collaborators: Collaborators, config: ReaderConfig) -> Result<Self> {
        if collaborators.resolver.domain_of(&config.owner.chain).is_none() {
            return Err(GovernError::UnknownChain(config.owner.chain.clone()));
        }
        Ok(Self {
            collaborators,
            config,
            interfaces: Interfaces::new()?,
        })
    }

    /// Start an audit with an empty anomaly log and fresh caches
    pub fn session(&self) -> AuditSession<'_> {
        AuditSession {
            reader: self,
            anomalies: AnomalyLog::new(),
            multisend_cache: MultisendCache::new(),
            derivations: DerivationTracker::new(),
        }
    }

    /// Read one top-level transaction in a fresh session
    pub async fn audit(&self, chain: &str, tx: &Transaction) -> AuditReport {
        let session = self.session();
        let call = session.read(chain, tx).await;
        let anomalies = session.anomalies.drain();
        info!(
            chain,
            anomalies = anomalies.len(),
            mismatches = call.mismatches(),
            "Finished reading transaction"
        );
        AuditReport { call, anomalies }
    }
}

/// State of one audit, shared by all recursive branches
pub struct AuditSession<'r> {
    pub(crate) reader: &'r GovernTransactionReader,
    pub(crate) anomalies: AnomalyLog,
    pub(crate) multisend_cache: MultisendCache,
    pub(crate) derivations: DerivationTracker,
}

impl<'r> AuditSession<'r> {
    /// Decode `tx` as executed on `chain`
    ///
    /// Never fails: decode errors become an `Unknown` node plus a fatal anomaly
    /// so the rest of a batch is still audited.
    pub fn read<'s>(&'s self, chain: &'s str, tx: &'s Transaction) -> BoxFuture<'s, DecodedCall> {
        async move {
            match self.try_read(chain, tx).await {
                Ok(call) => call,
                Err(err) => self.decode_failure(chain, tx, err),
            }
        }
        .boxed()
    }

    /// Findings appended so far
    pub fn anomalies(&self) -> Vec<AnomalyRecord> {
        self.anomalies.snapshot()
    }

    /// Take the findings, leaving the log empty
    pub fn take_anomalies(&self) -> Vec<AnomalyRecord> {
        self.anomalies.drain()
    }

    /// Chains whose security-module derivation is currently running
    pub fn derivations_in_progress(&self) -> Vec<ChainName> {
        self.derivations.in_progress()
    }

    async fn try_read(&self, chain: &str, tx: &Transaction) -> Result<DecodedCall> {
        let classification = self.classify(chain, tx).await?;
        debug!(chain, to = ?tx.to, ?classification, "Classified transaction");

        match classification {
            Classification::RemoteAccount => self.read_ica_transaction(chain, tx).await,
            Classification::CoreMessaging => self.read_mailbox_transaction(chain, tx).await,
            Classification::Batch => self.read_multisend_transaction(chain, tx).await,
            Classification::Unknown => Ok(self.unknown_transaction(chain, tx)),
        }
    }

    async fn read_multisend_transaction(&self, chain: &str, tx: &Transaction) -> Result<DecodedCall> {
        let data = tx.payload().ok_or(GovernError::MissingPayload("multisend"))?;
        let items = decode_multisend(data)?;
        debug!(chain, entries = items.len(), "Decoded multisend batch");

        let symbol = self.native_symbol(chain);
        let transactions: Vec<Transaction> =
            items.iter().map(MultiSendItem::to_transaction).collect();
        let decoded = join_all(transactions.iter().map(|sub| self.read(chain, sub))).await;

        let multisends = items
            .iter()
            .zip(decoded)
            .enumerate()
            .map(|(index, (item, decoded))| MultiSendEntry {
                chain: chain.to_string(),
                index,
                value: format_native(item.value, &symbol),
                operation: item.operation,
                decoded,
            })
            .collect();

        Ok(DecodedCall::BatchCall(BatchCall {
            chain: chain.to_string(),
            to: label("MultiSendCallOnly", chain, tx.to),
            multisends,
        }))
    }

    fn unknown_transaction(&self, chain: &str, tx: &Transaction) -> DecodedCall {
        self.anomalies.push(AnomalyRecord::warning(
            chain,
            Offending::Transaction {
                transaction: tx.clone(),
            },
            "Unknown transaction type",
        ));
        DecodedCall::Unknown(UnknownCall {
            chain: chain.to_string(),
            transaction: tx.clone(),
            insight: UNKNOWN_INSIGHT.to_string(),
        })
    }

    fn decode_failure(&self, chain: &str, tx: &Transaction, err: GovernError) -> DecodedCall {
        warn!(chain, to = ?tx.to, error = %err, "Failed to decode transaction");
        self.anomalies.push(AnomalyRecord::fatal(
            chain,
            Offending::Error {
                transaction: tx.clone(),
                message: err.to_string(),
            },
            format!("Failed to decode transaction: {}", err),
        ));
        DecodedCall::Unknown(UnknownCall {
            chain: chain.to_string(),
            transaction: tx.clone(),
            insight: format!("❌ {}", err),
        })
    }

    pub(crate) fn native_symbol(&self, chain: &str) -> String {
        self.reader
            .collaborators
            .resolver
            .native_symbol(chain)
            .unwrap_or_else(|| "native".to_string())
    }

    pub(crate) fn retry(&self) -> &RetryPolicy {
        &self.reader.config.retry
    }
}

/// Display label for a contract target, e.g. `Mailbox (ethereum 0x…)`
pub(crate) fn label(name: &str, chain: &str, address: Option<Address>) -> String {
    match address {
        Some(address) => format!("{} ({} {})", name, chain, address),
        None => format!("{} ({})", name, chain),
    }
}
