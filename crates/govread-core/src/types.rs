//! Input and shared value types
//!
//! Transactions, operation kinds, classifications and the contract names the
//! chain directory knows about.

use alloy_primitives::{utils::format_units, Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical chain identifier (e.g. `ethereum`, `polygon`)
pub type ChainName = String;

/// Numeric messaging domain of a chain
pub type Domain = u32;

/// A single call handed to the auditor
///
/// The chain a transaction executes on is passed alongside it to
/// `read(chain, tx)` rather than stored in it, so synthesized sub-calls can be
/// re-targeted at a remote chain without copying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Call target, absent for malformed or contract-creation inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Native value attached to the call
    #[serde(default)]
    pub value: U256,
    /// Call data including the 4-byte selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl Transaction {
    /// Create a zero-value call to `to` with the given call data
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to: Some(to),
            value: U256::ZERO,
            data: Some(data.into()),
        }
    }

    /// Attach a native value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Call data if present and non-empty
    pub fn payload(&self) -> Option<&Bytes> {
        self.data.as_ref().filter(|data| !data.is_empty())
    }
}

/// How a batch-wrapper sub-call is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Regular `CALL`
    Call,
    /// `DELEGATECALL`
    DelegateCall,
    /// Any other encoded operation byte
    Unknown(u8),
}

impl OperationKind {
    /// The operation byte used in the packed MultiSend encoding
    pub fn as_byte(self) -> u8 {
        match self {
            OperationKind::Call => 0,
            OperationKind::DelegateCall => 1,
            OperationKind::Unknown(byte) => byte,
        }
    }
}

impl From<u8> for OperationKind {
    fn from(byte: u8) -> Self {
        match byte {
            0 => OperationKind::Call,
            1 => OperationKind::DelegateCall,
            other => OperationKind::Unknown(other),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Call => write!(f, "Call"),
            OperationKind::DelegateCall => write!(f, "Delegate Call"),
            OperationKind::Unknown(byte) => write!(f, "Unknown ({})", byte),
        }
    }
}

/// Decoding path chosen for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Call to the interchain account router
    RemoteAccount,
    /// Call to the mailbox
    CoreMessaging,
    /// Call to the MultiSendCallOnly batch wrapper
    Batch,
    /// Anything else
    Unknown,
}

/// Contracts the chain directory can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractName {
    /// Core messaging entrypoint
    Mailbox,
    /// Interchain account router
    InterchainAccountRouter,
    /// Known governance interchain account on the chain
    GovernanceAccount,
}

impl fmt::Display for ContractName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractName::Mailbox => "mailbox",
            ContractName::InterchainAccountRouter => "interchainAccountRouter",
            ContractName::GovernanceAccount => "governanceAccount",
        };
        f.write_str(name)
    }
}

/// A decoded function argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedArg {
    /// Parameter name (or `arg{n}` if unnamed)
    pub name: String,
    /// Solidity type (e.g. `address`, `(bytes32,uint256,bytes)[]`)
    pub kind: String,
    /// Decoded value as a formatted string
    pub value: String,
}

/// Render a wei amount in ether units followed by the native symbol
///
/// Trailing zeros are trimmed but one fractional digit is kept, so one ether
/// renders as `1.0 ETH`.
pub fn format_native(value: U256, symbol: &str) -> String {
    let mut amount = format_units(value, "ether").unwrap_or_else(|_| value.to_string());
    if amount.contains('.') {
        let trimmed = amount.trim_end_matches('0').len();
        amount.truncate(trimmed);
        if amount.ends_with('.') {
            amount.push('0');
        }
    }
    format!("{} {}", amount, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_kind_bytes() {
        assert_eq!(OperationKind::from(0), OperationKind::Call);
        assert_eq!(OperationKind::from(1), OperationKind::DelegateCall);
        assert_eq!(OperationKind::from(7), OperationKind::Unknown(7));
        assert_eq!(OperationKind::Unknown(7).as_byte(), 7);
        assert_eq!(OperationKind::DelegateCall.to_string(), "Delegate Call");
        assert_eq!(OperationKind::Unknown(2).to_string(), "Unknown (2)");
    }

    #[test]
    fn test_format_native() {
        assert_eq!(format_native(U256::ZERO, "ETH"), "0.0 ETH");
        let one_and_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_native(one_and_half, "MATIC"), "1.5 MATIC");
        assert_eq!(format_native(U256::from(1u64), "ETH"), "0.000000000000000001 ETH");
    }

    #[test]
    fn test_payload_filters_empty_data() {
        let tx = Transaction::new(Address::ZERO, Bytes::new());
        assert!(tx.payload().is_none());
        let tx = Transaction::new(Address::ZERO, vec![0xde, 0xad]);
        assert_eq!(tx.payload().map(|b| b.len()), Some(2));
    }

    #[test]
    fn test_transaction_json_shape() {
        let json = r#"{"to":"0x00000000000000000000000000000000000000aa","value":"0x1","data":"0x1234"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.value, U256::from(1u64));
        assert_eq!(tx.data.unwrap().as_ref(), &[0x12, 0x34]);
    }
}
