//! Selective alloy imports and contract interfaces
//!
//! This module imports only the alloy components needed for ABI decoding and
//! declares, with `sol!`, the handful of governance entrypoints that get typed
//! decoding and enrichment. Everything else is decoded dynamically from the
//! method tables in [`crate::methods`].

// Core primitive types
pub use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

// ABI encoding/decoding functionality
pub use alloy_sol_types::{sol, SolCall};

sol! {
    /// A call an interchain account executes on the destination chain
    struct IcaCall {
        bytes32 to;
        uint256 value;
        bytes data;
    }

    /// Interchain account router governance surface
    interface IInterchainAccountRouter {
        function enrollRemoteRouter(uint32 _domain, bytes32 _router) external;
        function enrollRemoteRouters(uint32[] _domains, bytes32[] _addresses) external;
        function callRemoteWithOverrides(
            uint32 _destination,
            bytes32 _router,
            bytes32 _ism,
            IcaCall[] _calls
        ) external payable returns (bytes32);
    }

    /// Mailbox governance surface
    interface IMailbox {
        function setDefaultIsm(address _module) external;
    }

    /// Safe batch wrapper
    interface IMultiSendCallOnly {
        function multiSend(bytes transactions) external payable;
    }
}

/// Split the 4-byte selector off call data
pub fn selector_of(data: &[u8]) -> Option<[u8; 4]> {
    data.get(..4).and_then(|selector| selector.try_into().ok())
}

/// Render a 32-byte word as 0x-prefixed hex
pub fn word_hex(word: &B256) -> String {
    format!("0x{}", hex::encode(word))
}

/// Whether an encoded router word is exactly `expected`, left-padded with zeros
///
/// The decoded address alone is not enough: non-zero high bytes would still
/// decode to the expected address.
pub fn router_matches(expected: Address, router: B256) -> bool {
    let decoded = Address::from_word(router);
    decoded == expected && decoded.into_word() == router
}
