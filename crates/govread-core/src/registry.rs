//! In-memory chain registry
//!
//! `StaticChainRegistry` is the table-backed implementation of the directory,
//! resolver, multisend resolver and reference config provider. It is built from
//! per-chain metadata (typically loaded from a config file) plus a set of
//! pre-derived module configurations.

use crate::error::{GovernError, Result};
use crate::ism::IsmConfig;
use crate::traits::{ChainDirectory, ChainResolver, MultisendResolver, ReferenceConfigProvider};
use crate::types::{ChainName, ContractName, Domain};
use alloy_primitives::Address;
use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

fn default_native_symbol() -> String {
    "ETH".to_string()
}

/// Deployment metadata for one chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainMetadata {
    /// Messaging domain
    pub domain: Domain,
    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,
    #[serde(default)]
    pub mailbox: Option<Address>,
    #[serde(default)]
    pub interchain_account_router: Option<Address>,
    /// MultiSendCallOnly used by the chain's governance Safe
    #[serde(default)]
    pub multisend: Option<Address>,
    /// Known governance interchain account on this chain
    #[serde(default)]
    pub governance_account: Option<Address>,
    /// Expected default security module
    #[serde(default)]
    pub default_ism: Option<Value>,
}

/// Table-backed registry
#[derive(Debug, Clone, Default)]
pub struct StaticChainRegistry {
    chains: BTreeMap<ChainName, ChainMetadata>,
    derived_isms: HashMap<(ChainName, Address), IsmConfig>,
}

impl StaticChainRegistry {
    pub fn new(chains: BTreeMap<ChainName, ChainMetadata>) -> Self {
        Self {
            chains,
            derived_isms: HashMap::new(),
        }
    }

    /// Add or replace one chain
    pub fn with_chain(mut self, name: impl Into<ChainName>, metadata: ChainMetadata) -> Self {
        self.chains.insert(name.into(), metadata);
        self
    }

    /// Register the derived configuration of a deployed module
    pub fn with_derived_ism(
        mut self,
        chain: impl Into<ChainName>,
        module: Address,
        config: IsmConfig,
    ) -> Self {
        self.derived_isms.insert((chain.into(), module), config);
        self
    }

    pub fn chain(&self, name: &str) -> Option<&ChainMetadata> {
        self.chains.get(name)
    }
}

impl ChainDirectory for StaticChainRegistry {
    fn address_of(&self, chain: &str, contract: ContractName) -> Option<Address> {
        let metadata = self.chains.get(chain)?;
        match contract {
            ContractName::Mailbox => metadata.mailbox,
            ContractName::InterchainAccountRouter => metadata.interchain_account_router,
            ContractName::GovernanceAccount => metadata.governance_account,
        }
    }
}

impl ChainResolver for StaticChainRegistry {
    fn chain_of(&self, domain: Domain) -> Option<ChainName> {
        self.chains
            .iter()
            .find(|(_, metadata)| metadata.domain == domain)
            .map(|(name, _)| name.clone())
    }

    fn domain_of(&self, chain: &str) -> Option<Domain> {
        self.chains.get(chain).map(|metadata| metadata.domain)
    }

    fn native_symbol(&self, chain: &str) -> Option<String> {
        self.chains.get(chain).map(|metadata| metadata.native_symbol.clone())
    }
}

impl ReferenceConfigProvider for StaticChainRegistry {
    fn expected_security_module(&self, chain: &str) -> Option<IsmConfig> {
        self.chains
            .get(chain)?
            .default_ism
            .clone()
            .map(IsmConfig::new)
    }

    fn derive_security_module<'a>(
        &'a self,
        chain: &'a str,
        module: Address,
    ) -> BoxFuture<'a, Result<IsmConfig>> {
        let derived = self
            .derived_isms
            .get(&(chain.to_string(), module))
            .cloned()
            .ok_or_else(|| {
                GovernError::Derivation(format!(
                    "no derived config recorded for module {} on {}",
                    module, chain
                ))
            });
        future::ready(derived).boxed()
    }
}

impl MultisendResolver for StaticChainRegistry {
    fn multisend_address<'a>(&'a self, chain: &'a str) -> BoxFuture<'a, Result<Option<Address>>> {
        let address = self.chains.get(chain).and_then(|metadata| metadata.multisend);
        future::ready(Ok(address)).boxed()
    }
}
