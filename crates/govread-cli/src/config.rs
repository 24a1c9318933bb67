//! Audit configuration loading
//!
//! The config names the governance owner, the per-chain deployment and the
//! module configs already derived for the chains being audited. It is read from
//! TOML, or from JSON when the file has a `.json` extension.

use anyhow::{bail, Context, Result};
use govread_core::{
    ChainMetadata, ChainName, Collaborators, IsmConfig, RetryPolicy, StaticChainRegistry,
};
use govread_ethereum::alloy::{Address, B256};
use govread_ethereum::{Create2AccountDeriver, GovernTransactionReader, GovernanceOwner, ReaderConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One chain of the deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(flatten)]
    pub metadata: ChainMetadata,
    /// Init-code hash of the interchain account proxy deployed on this chain
    #[serde(default)]
    pub ica_bytecode_hash: Option<B256>,
}

/// A module config derived ahead of the audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedIsm {
    pub chain: ChainName,
    pub module: Address,
    pub config: IsmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub owner: GovernanceOwner,
    #[serde(default)]
    pub retry: RetryPolicy,
    pub chains: BTreeMap<ChainName, ChainConfig>,
    #[serde(default)]
    pub derived_isms: Vec<DerivedIsm>,
}

impl AuditConfig {
    /// Load from a TOML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AuditConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)?,
        };
        config.validate()?;
        debug!(
            chains = config.chains.len(),
            derived_isms = config.derived_isms.len(),
            "Loaded audit config"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.chains.contains_key(&self.owner.chain) {
            bail!("Owner chain {} is not configured", self.owner.chain);
        }
        for derived in &self.derived_isms {
            if !self.chains.contains_key(&derived.chain) {
                bail!(
                    "Derived ISM {} refers to unknown chain {}",
                    derived.module,
                    derived.chain
                );
            }
        }
        Ok(())
    }

    /// Table-backed registry for every configured chain
    pub fn registry(&self) -> StaticChainRegistry {
        let chains = self
            .chains
            .iter()
            .map(|(name, chain)| (name.clone(), chain.metadata.clone()))
            .collect();
        self.derived_isms
            .iter()
            .fold(StaticChainRegistry::new(chains), |registry, derived| {
                registry.with_derived_ism(derived.chain.clone(), derived.module, derived.config.clone())
            })
    }

    /// Reader backed by the static registry and CREATE2 account derivation
    pub fn reader(&self) -> Result<GovernTransactionReader> {
        let registry = Arc::new(self.registry());
        let deriver = self
            .chains
            .iter()
            .filter_map(|(name, chain)| chain.ica_bytecode_hash.map(|hash| (name, hash)))
            .fold(
                Create2AccountDeriver::new(registry.clone(), registry.clone()),
                |deriver, (name, hash)| deriver.with_bytecode_hash(name.clone(), hash),
            );

        let collaborators = Collaborators::from_registry(registry, Arc::new(deriver));
        let config = ReaderConfig {
            owner: self.owner.clone(),
            retry: self.retry.clone(),
        };
        Ok(GovernTransactionReader::new(collaborators, config)?)
    }
}
