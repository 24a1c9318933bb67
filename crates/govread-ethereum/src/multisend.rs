//! Safe MultiSend packed-transaction codec
//!
//! `multiSend(bytes transactions)` carries a concatenation of entries, each laid
//! out as:
//!
//! ```text
//! operation  u8        1 byte
//! to         address  20 bytes
//! value      uint256  32 bytes, big endian
//! dataLength uint256  32 bytes, big endian
//! data       bytes    dataLength bytes
//! ```

use crate::alloy::{selector_of, Address, Bytes, IMultiSendCallOnly, SolCall, U256};
use govread_core::{GovernError, OperationKind, Result, Transaction};

const HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// One entry of a packed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSendItem {
    pub operation: OperationKind,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl MultiSendItem {
    /// A plain `CALL` entry
    pub fn call(to: Address, value: U256, data: impl Into<Bytes>) -> Self {
        Self {
            operation: OperationKind::Call,
            to,
            value,
            data: data.into(),
        }
    }

    /// The entry as a transaction on the batch's own chain
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            to: Some(self.to),
            value: self.value,
            data: Some(self.data.clone()),
        }
    }
}

/// Decode full `multiSend` call data (selector included)
pub fn decode_multisend(data: &[u8]) -> Result<Vec<MultiSendItem>> {
    match selector_of(data) {
        Some(selector) if selector == IMultiSendCallOnly::multiSendCall::SELECTOR => {}
        Some(selector) => {
            return Err(GovernError::MalformedBatchData(format!(
                "unexpected selector 0x{}",
                hex::encode(selector)
            )))
        }
        None => {
            return Err(GovernError::MalformedBatchData(
                "call data shorter than a selector".to_string(),
            ))
        }
    }

    let call = IMultiSendCallOnly::multiSendCall::abi_decode(data, true)
        .map_err(|e| GovernError::MalformedBatchData(e.to_string()))?;
    decode_packed(&call.transactions)
}

/// Decode the packed entry list carried by `multiSend`
pub fn decode_packed(packed: &[u8]) -> Result<Vec<MultiSendItem>> {
    let mut items = Vec::new();
    let mut offset = 0;

    while offset < packed.len() {
        let header = packed.get(offset..offset + HEADER_LEN).ok_or_else(|| {
            GovernError::MalformedBatchData(format!(
                "entry {} truncated: {} header bytes left, {} needed",
                items.len(),
                packed.len() - offset,
                HEADER_LEN
            ))
        })?;

        let operation = OperationKind::from(header[0]);
        let to = Address::from_slice(&header[1..21]);
        let value = U256::from_be_slice(&header[21..53]);
        let data_len = usize::try_from(U256::from_be_slice(&header[53..85])).map_err(|_| {
            GovernError::MalformedBatchData(format!("entry {} data length overflows", items.len()))
        })?;

        let start = offset + HEADER_LEN;
        let data = start
            .checked_add(data_len)
            .and_then(|end| packed.get(start..end))
            .ok_or_else(|| {
                GovernError::MalformedBatchData(format!(
                    "entry {} declares {} data bytes, {} left",
                    items.len(),
                    data_len,
                    packed.len() - start
                ))
            })?;

        items.push(MultiSendItem {
            operation,
            to,
            value,
            data: Bytes::copy_from_slice(data),
        });
        offset = start + data_len;
    }

    Ok(items)
}

/// Pack entries into the `multiSend` transactions blob
pub fn encode_packed(items: &[MultiSendItem]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(items.iter().map(|i| HEADER_LEN + i.data.len()).sum());
    for item in items {
        packed.push(item.operation.as_byte());
        packed.extend_from_slice(item.to.as_slice());
        packed.extend_from_slice(&item.value.to_be_bytes::<32>());
        packed.extend_from_slice(&U256::from(item.data.len()).to_be_bytes::<32>());
        packed.extend_from_slice(&item.data);
    }
    packed
}

/// Full `multiSend` call data for the given entries
pub fn encode_multisend(items: &[MultiSendItem]) -> Bytes {
    IMultiSendCallOnly::multiSendCall {
        transactions: encode_packed(items).into(),
    }
    .abi_encode()
    .into()
}
