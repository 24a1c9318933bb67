//! EVM decoding for governance transaction audits
//!
//! This crate implements the recursive reader on top of `govread-core`: target
//! classification, Safe MultiSend batch decoding, interchain account router and
//! mailbox decoding, and CREATE2 derivation of interchain accounts.
//!
//! ```rust,ignore
//! let reader = GovernTransactionReader::new(collaborators, config)?;
//! let report = reader.audit("ethereum", &tx).await;
//! if report.has_fatal() {
//!     // reject the proposal
//! }
//! ```

pub mod account;
pub mod alloy;
mod classifier;
mod decoders;
pub mod methods;
pub mod multisend;
pub mod reader;

pub use account::{account_salt, Create2AccountDeriver};
pub use methods::{Enrichment, Interfaces, Method, MethodTable};
pub use multisend::{decode_multisend, decode_packed, encode_multisend, encode_packed, MultiSendItem};
pub use reader::{AuditReport, AuditSession, GovernTransactionReader, GovernanceOwner, ReaderConfig};
