//! Trait definitions for the auditor's external collaborators
//!
//! The auditor never talks to chains, multisig services or config stores
//! directly. It is handed implementations of these traits, bundled in
//! [`Collaborators`]. Lookups that may hit the network return a boxed future
//! so the traits stay object safe.

use crate::error::Result;
use crate::ism::IsmConfig;
use crate::types::{ChainName, ContractName, Domain};
use alloy_primitives::{Address, B256};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only table of deployed contract addresses per chain
pub trait ChainDirectory: Send + Sync {
    /// Address of `contract` on `chain`, if registered
    fn address_of(&self, chain: &str, contract: ContractName) -> Option<Address>;
}

/// Maps between chain names and numeric messaging domains
pub trait ChainResolver: Send + Sync {
    /// Chain registered for a domain
    fn chain_of(&self, domain: Domain) -> Option<ChainName>;

    /// Domain of a chain
    fn domain_of(&self, chain: &str) -> Option<Domain>;

    /// Native currency symbol of a chain (e.g. `ETH`)
    fn native_symbol(&self, chain: &str) -> Option<String>;
}

/// Source of expected and live security-module configurations
pub trait ReferenceConfigProvider: Send + Sync {
    /// Statically configured default security module for a chain
    fn expected_security_module(&self, chain: &str) -> Option<IsmConfig>;

    /// Derive the configuration of a deployed module from on-chain state
    ///
    /// Potentially slow and externally rate limited.
    fn derive_security_module<'a>(
        &'a self,
        chain: &'a str,
        module: Address,
    ) -> BoxFuture<'a, Result<IsmConfig>>;
}

/// Inputs that determine an interchain account address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAccountKey {
    /// Owner of the account on the origin chain
    pub owner: Address,
    /// Chain the owner lives on
    pub origin_chain: ChainName,
    /// Router override as encoded in the call
    pub router_override: B256,
    /// Security-module override as encoded in the call
    pub ism_override: B256,
}

/// Computes the interchain account a remote call will execute from
pub trait RemoteAccountDeriver: Send + Sync {
    /// Account on `chain` controlled by the key's owner
    fn expected_remote_account<'a>(
        &'a self,
        chain: &'a str,
        key: &'a RemoteAccountKey,
    ) -> BoxFuture<'a, Result<Address>>;
}

/// Resolves the batch-wrapper contract used by a chain's multisig
pub trait MultisendResolver: Send + Sync {
    /// `None` when the chain has no configured multisig
    fn multisend_address<'a>(&'a self, chain: &'a str) -> BoxFuture<'a, Result<Option<Address>>>;
}

/// Every collaborator the reader needs
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn ChainDirectory>,
    pub resolver: Arc<dyn ChainResolver>,
    pub configs: Arc<dyn ReferenceConfigProvider>,
    pub accounts: Arc<dyn RemoteAccountDeriver>,
    pub multisend: Arc<dyn MultisendResolver>,
}

impl Collaborators {
    /// Use one registry for every table-backed collaborator
    pub fn from_registry<T>(registry: Arc<T>, accounts: Arc<dyn RemoteAccountDeriver>) -> Self
    where
        T: ChainDirectory + ChainResolver + ReferenceConfigProvider + MultisendResolver + 'static,
    {
        Self {
            directory: registry.clone(),
            resolver: registry.clone(),
            configs: registry.clone(),
            accounts,
            multisend: registry,
        }
    }
}
