//! Command implementations for the govread CLI tool

pub mod decode_batch;
pub mod read;

pub use decode_batch::cmd_decode_batch;
pub use read::cmd_read;
