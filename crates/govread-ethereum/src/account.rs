//! Deterministic interchain account addresses
//!
//! Interchain accounts are minimal proxies deployed by the destination router
//! with CREATE2. The salt commits to the origin domain, owner, origin router and
//! security-module override, so the account can be computed offline once the
//! proxy bytecode hash is known.

use crate::alloy::{keccak256, Address, B256};
use futures::future::{self, BoxFuture, FutureExt};
use govread_core::{
    ChainDirectory, ChainName, ChainResolver, ContractName, GovernError, RemoteAccountDeriver,
    RemoteAccountKey, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// CREATE2 derivation of interchain account addresses
pub struct Create2AccountDeriver {
    directory: Arc<dyn ChainDirectory>,
    resolver: Arc<dyn ChainResolver>,
    bytecode_hashes: HashMap<ChainName, B256>,
}

impl Create2AccountDeriver {
    pub fn new(directory: Arc<dyn ChainDirectory>, resolver: Arc<dyn ChainResolver>) -> Self {
        Self {
            directory,
            resolver,
            bytecode_hashes: HashMap::new(),
        }
    }

    /// Register the proxy init-code hash used by a chain's router
    pub fn with_bytecode_hash(mut self, chain: impl Into<ChainName>, hash: B256) -> Self {
        self.bytecode_hashes.insert(chain.into(), hash);
        self
    }

    fn router_of(&self, chain: &str) -> Result<Address> {
        self.directory
            .address_of(chain, ContractName::InterchainAccountRouter)
            .ok_or_else(|| GovernError::MissingAddress {
                chain: chain.to_string(),
                contract: ContractName::InterchainAccountRouter.to_string(),
            })
    }

    /// Account on `chain` for the given key
    pub fn derive(&self, chain: &str, key: &RemoteAccountKey) -> Result<Address> {
        let origin_domain = self
            .resolver
            .domain_of(&key.origin_chain)
            .ok_or_else(|| GovernError::UnknownChain(key.origin_chain.clone()))?;
        let origin_router = self.router_of(&key.origin_chain)?;

        // A zero override means the destination's own router deploys the account
        let deployer = if key.router_override == B256::ZERO {
            self.router_of(chain)?
        } else {
            Address::from_word(key.router_override)
        };

        let bytecode_hash = self.bytecode_hashes.get(chain).ok_or_else(|| {
            GovernError::Derivation(format!(
                "no interchain account bytecode hash configured for {}",
                chain
            ))
        })?;

        let salt = account_salt(
            origin_domain,
            key.owner.into_word(),
            origin_router.into_word(),
            key.ism_override,
        );
        let account = deployer.create2(salt.0, bytecode_hash.0);
        debug!(chain, %deployer, %account, "Derived interchain account");
        Ok(account)
    }
}

/// keccak256(abi.encodePacked(uint32 origin, bytes32 owner, bytes32 router, bytes32 ism))
pub fn account_salt(origin_domain: u32, owner: B256, origin_router: B256, ism: B256) -> B256 {
    let mut packed = Vec::with_capacity(4 + 32 * 3);
    packed.extend_from_slice(&origin_domain.to_be_bytes());
    packed.extend_from_slice(owner.as_slice());
    packed.extend_from_slice(origin_router.as_slice());
    packed.extend_from_slice(ism.as_slice());
    keccak256(packed)
}

impl RemoteAccountDeriver for Create2AccountDeriver {
    fn expected_remote_account<'a>(
        &'a self,
        chain: &'a str,
        key: &'a RemoteAccountKey,
    ) -> BoxFuture<'a, Result<Address>> {
        future::ready(self.derive(chain, key)).boxed()
    }
}
