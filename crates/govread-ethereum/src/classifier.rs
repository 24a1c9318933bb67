//! Target-address classification

use crate::alloy::Address;
use crate::reader::AuditSession;
use govread_core::{retry_async, Classification, ContractName, Result, Transaction};

impl AuditSession<'_> {
    /// Decide which decoder handles `tx` on `chain`
    ///
    /// The router is checked first, then the mailbox, then the batch wrapper.
    /// A missing target classifies as `Unknown`.
    pub async fn classify(&self, chain: &str, tx: &Transaction) -> Result<Classification> {
        let Some(to) = tx.to else {
            return Ok(Classification::Unknown);
        };

        let directory = &self.reader.collaborators.directory;
        if directory.address_of(chain, ContractName::InterchainAccountRouter) == Some(to) {
            return Ok(Classification::RemoteAccount);
        }
        if directory.address_of(chain, ContractName::Mailbox) == Some(to) {
            return Ok(Classification::CoreMessaging);
        }
        if self.multisend_address(chain).await? == Some(to) {
            return Ok(Classification::Batch);
        }
        Ok(Classification::Unknown)
    }

    /// Batch wrapper used by `chain`'s multisig, looked up once per session
    pub async fn multisend_address(&self, chain: &str) -> Result<Option<Address>> {
        let resolver = &self.reader.collaborators.multisend;
        let policy = self.retry();
        self.multisend_cache
            .get_or_resolve(chain, || {
                retry_async(policy, "multisend address lookup", || {
                    resolver.multisend_address(chain)
                })
            })
            .await
    }
}
