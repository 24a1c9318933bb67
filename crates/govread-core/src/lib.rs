//! Core types and traits for governance transaction auditing
//!
//! This crate holds the chain-agnostic model of an audit: the transaction being
//! reviewed, the annotated call tree produced for it, the anomaly log, and the
//! traits through which the auditor reaches its external collaborators (chain
//! directory, reference config provider, remote account deriver, multisend
//! resolver).
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! govread-core = { path = "../govread-core" }
//! ```
//!
//! Chain-specific decoding lives in `govread-ethereum`.

// Module declarations
pub mod anomaly;
pub mod cache;
pub mod call;
pub mod error;
pub mod insight;
pub mod ism;
pub mod registry;
pub mod retry;
pub mod traits;
pub mod types;

// Re-export all public types and traits for convenience
pub use anomaly::{AnomalyLog, AnomalyRecord, Offending, RemoteContext, Severity};
pub use cache::{DerivationTracker, MultisendCache};
pub use call::{
    BatchCall, CoreMessagingArgs, CoreMessagingCall, DecodedCall, Destination, MultiSendEntry,
    RemoteAccountArgs, RemoteAccountCall, RemoteCallInsight, RouterEnrollment,
    SetDefaultIsmInsight, UnknownCall,
};
pub use error::{GovernError, Result};
pub use insight::{Insight, Verdict};
pub use ism::IsmConfig;
pub use registry::{ChainMetadata, StaticChainRegistry};
pub use retry::{retry_async, RetryPolicy};
pub use traits::{
    ChainDirectory, ChainResolver, Collaborators, MultisendResolver, ReferenceConfigProvider,
    RemoteAccountDeriver, RemoteAccountKey,
};
pub use types::{
    format_native, ChainName, Classification, ContractName, DecodedArg, Domain, OperationKind,
    Transaction,
};
