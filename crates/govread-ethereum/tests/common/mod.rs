//! Shared fixtures for reader tests
//!
//! Chain metadata comes from `data/chains.json`; interchain accounts are served
//! by a table-backed deriver so expected accounts can be stated directly.

#![allow(dead_code)]

use futures::future::{self, BoxFuture, FutureExt};
use govread_core::{
    ChainMetadata, Collaborators, GovernError, IsmConfig, MultisendResolver,
    ReferenceConfigProvider, RemoteAccountDeriver, RemoteAccountKey, Result, RetryPolicy,
    StaticChainRegistry, Transaction,
};
use govread_ethereum::alloy::{
    keccak256, Address, Bytes, IInterchainAccountRouter, IMailbox, IcaCall, SolCall, B256, U256,
};
use govread_ethereum::{GovernTransactionReader, GovernanceOwner, ReaderConfig};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ETH_MAILBOX: Address = Address::new(word_tail(0xa1));
pub const ETH_ICA_ROUTER: Address = Address::new(word_tail(0xe1));
pub const ETH_MULTISEND: Address = Address::new(word_tail(0xf1));
pub const POLYGON_MAILBOX: Address = Address::new(word_tail(0xa2));
pub const POLYGON_ICA_ROUTER: Address = Address::new(word_tail(0xe2));
pub const POLYGON_MULTISEND: Address = Address::new(word_tail(0xf2));
pub const POLYGON_ACCOUNT: Address = Address::new(word_tail(0xc2));
pub const ARBITRUM_ICA_ROUTER: Address = Address::new(word_tail(0xe3));
pub const ARBITRUM_ACCOUNT: Address = Address::new(word_tail(0xc3));

/// Account the fixture deriver returns for arbitrum, never the registered one
pub const STRAY_ACCOUNT: Address = Address::new(word_tail(0xdd));

pub const OWNER: Address = Address::new(word_tail(0x0a));
pub const GOOD_ISM: Address = Address::new(word_tail(0x1a));
pub const BAD_ISM: Address = Address::new(word_tail(0x1b));
pub const STRANGER: Address = Address::new(word_tail(0x99));

const fn word_tail(last: u8) -> [u8; 20] {
    let mut bytes = [0u8; 20];
    bytes[19] = last;
    bytes
}

/// Registry loaded from the JSON fixture plus derived module configs
pub fn registry() -> StaticChainRegistry {
    let chains: BTreeMap<String, ChainMetadata> =
        serde_json::from_str(include_str!("../data/chains.json"))
            .expect("Failed to parse chain fixture");

    StaticChainRegistry::new(chains)
        .with_derived_ism(
            "ethereum",
            GOOD_ISM,
            IsmConfig::new(json!({
                "address": "0x000000000000000000000000000000000000001a",
                "type": "staticAggregationIsm",
                "threshold": 2,
                "modules": [
                    "0x00000000000000000000000000000000000000B2",
                    "0x00000000000000000000000000000000000000b1"
                ]
            })),
        )
        .with_derived_ism(
            "ethereum",
            BAD_ISM,
            IsmConfig::new(json!({
                "address": "0x000000000000000000000000000000000000001b",
                "type": "staticAggregationIsm",
                "threshold": 1,
                "modules": ["0x00000000000000000000000000000000000000b1"]
            })),
        )
}

/// Deriver answering from a fixed table
#[derive(Default)]
pub struct TableDeriver {
    pub calls: AtomicUsize,
}

impl RemoteAccountDeriver for TableDeriver {
    fn expected_remote_account<'a>(
        &'a self,
        chain: &'a str,
        _key: &'a RemoteAccountKey,
    ) -> BoxFuture<'a, Result<Address>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let account = match chain {
            "polygon" => Ok(POLYGON_ACCOUNT),
            "arbitrum" => Ok(STRAY_ACCOUNT),
            other => Err(GovernError::external(format!("no account for {}", other))),
        };
        future::ready(account).boxed()
    }
}

/// Multisend resolver that counts lookups
pub struct CountingMultisend {
    pub inner: Arc<StaticChainRegistry>,
    pub lookups: Mutex<HashMap<String, usize>>,
}

impl CountingMultisend {
    pub fn new(inner: Arc<StaticChainRegistry>) -> Self {
        Self {
            inner,
            lookups: Mutex::new(HashMap::new()),
        }
    }

    pub fn lookups(&self, chain: &str) -> usize {
        self.lookups.lock().unwrap().get(chain).copied().unwrap_or(0)
    }
}

impl MultisendResolver for CountingMultisend {
    fn multisend_address<'a>(&'a self, chain: &'a str) -> BoxFuture<'a, Result<Option<Address>>> {
        *self.lookups.lock().unwrap().entry(chain.to_string()).or_default() += 1;
        self.inner.multisend_address(chain)
    }
}

/// Config provider whose derivation fails a fixed number of times first
pub struct FlakyConfigs {
    pub inner: Arc<StaticChainRegistry>,
    pub failures_left: AtomicUsize,
    pub attempts: AtomicUsize,
}

impl ReferenceConfigProvider for FlakyConfigs {
    fn expected_security_module(&self, chain: &str) -> Option<IsmConfig> {
        self.inner.expected_security_module(chain)
    }

    fn derive_security_module<'a>(
        &'a self,
        chain: &'a str,
        module: Address,
    ) -> BoxFuture<'a, Result<IsmConfig>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            future::ready(Err(GovernError::external("rpc rate limited"))).boxed()
        } else {
            self.inner.derive_security_module(chain, module)
        }
    }
}

pub fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay_ms: 1,
        max_delay_ms: 4,
        timeout_ms: Some(5_000),
    }
}

pub fn config() -> ReaderConfig {
    ReaderConfig {
        owner: GovernanceOwner {
            chain: "ethereum".to_string(),
            address: OWNER,
        },
        retry: quick_retry(),
    }
}

pub fn collaborators(registry: Arc<StaticChainRegistry>) -> Collaborators {
    Collaborators::from_registry(registry, Arc::new(TableDeriver::default()))
}

/// Reader over the default fixture
pub fn reader() -> GovernTransactionReader {
    GovernTransactionReader::new(collaborators(Arc::new(registry())), config())
        .expect("Failed to build reader")
}

pub fn enroll(domain: u32, router: B256) -> Bytes {
    IInterchainAccountRouter::enrollRemoteRouterCall {
        _domain: domain,
        _router: router,
    }
    .abi_encode()
    .into()
}

pub fn enroll_many(domains: Vec<u32>, routers: Vec<B256>) -> Bytes {
    IInterchainAccountRouter::enrollRemoteRoutersCall {
        _domains: domains,
        _addresses: routers,
    }
    .abi_encode()
    .into()
}

pub fn set_default_ism(module: Address) -> Bytes {
    IMailbox::setDefaultIsmCall { _module: module }.abi_encode().into()
}

pub fn call_remote(destination: u32, router: B256, ism: B256, calls: Vec<IcaCall>) -> Bytes {
    IInterchainAccountRouter::callRemoteWithOverridesCall {
        _destination: destination,
        _router: router,
        _ism: ism,
        _calls: calls,
    }
    .abi_encode()
    .into()
}

pub fn ica_call(to: Address, data: Bytes) -> IcaCall {
    IcaCall {
        to: to.into_word(),
        value: U256::ZERO,
        data,
    }
}

pub fn tx(to: Address, data: Bytes) -> Transaction {
    Transaction::new(to, data)
}

/// Call data for `signature` with each argument given as a 32-byte word
pub fn calldata(signature: &str, words: &[B256]) -> Bytes {
    let mut data = keccak256(signature.as_bytes())[..4].to_vec();
    for word in words {
        data.extend_from_slice(word.as_slice());
    }
    data.into()
}
