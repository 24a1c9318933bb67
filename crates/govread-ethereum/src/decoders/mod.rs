//! Per-contract decoders
//!
//! Each decoder extends [`crate::reader::AuditSession`] with the read path for
//! one classification.

mod ica;
mod mailbox;
