//! Decode-batch command implementation

use crate::cli::OutputFormat;
use crate::formatters::{format_batch, write_output};
use anyhow::{Context, Result};
use govread_ethereum::alloy::{IMultiSendCallOnly, SolCall};
use govread_ethereum::{decode_multisend, decode_packed, MultiSendItem};
use std::path::Path;
use tracing::debug;

/// Decode hex that is either full `multiSend` call data or a bare packed blob
pub fn decode_batch_hex(data: &str) -> Result<Vec<MultiSendItem>> {
    let bytes = hex::decode(data.trim().trim_start_matches("0x")).context("Invalid hex data")?;
    let items = if bytes.starts_with(&IMultiSendCallOnly::multiSendCall::SELECTOR) {
        debug!("Decoding multiSend call data");
        decode_multisend(&bytes)?
    } else {
        debug!("Decoding packed transactions");
        decode_packed(&bytes)?
    };
    Ok(items)
}

/// Execute decode-batch command
pub fn cmd_decode_batch(data: &str, format: &OutputFormat, output: Option<&Path>) -> Result<()> {
    let items = decode_batch_hex(data)?;
    write_output(&format_batch(&items, format)?, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use govread_ethereum::alloy::{Address, U256};
    use govread_ethereum::{encode_multisend, encode_packed};

    fn items() -> Vec<MultiSendItem> {
        vec![
            MultiSendItem::call(Address::repeat_byte(0x01), U256::ZERO, vec![0x01u8, 0x02]),
            MultiSendItem::call(Address::repeat_byte(0x02), U256::from(7u64), Vec::<u8>::new()),
        ]
    }

    #[test]
    fn test_accepts_call_data_and_packed_blob() {
        let call_data = format!("0x{}", hex::encode(encode_multisend(&items())));
        assert_eq!(decode_batch_hex(&call_data).unwrap(), items());

        let packed = hex::encode(encode_packed(&items()));
        assert_eq!(decode_batch_hex(&packed).unwrap(), items());
    }

    #[test]
    fn test_rejects_bad_hex() {
        assert!(decode_batch_hex("0xzz").is_err());
    }
}
