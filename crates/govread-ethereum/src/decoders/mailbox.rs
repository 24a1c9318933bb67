//! Mailbox decoding

use crate::alloy::{Address, IMailbox, SolCall};
use crate::methods::{positional_args, Enrichment};
use crate::reader::{label, AuditSession};
use govread_core::{
    format_native, retry_async, AnomalyRecord, CoreMessagingArgs, CoreMessagingCall, DecodedCall,
    GovernError, Insight, IsmConfig, Offending, Result, SetDefaultIsmInsight, Transaction,
};
use tracing::warn;

impl AuditSession<'_> {
    pub(crate) async fn read_mailbox_transaction(
        &self,
        chain: &str,
        tx: &Transaction,
    ) -> Result<DecodedCall> {
        let data = tx.payload().ok_or(GovernError::MissingPayload("mailbox"))?;
        let (method, selector) = self.reader.interfaces.mailbox.lookup(data)?;

        let (signature, args) = match method {
            None => (
                format!("0x{}", hex::encode(selector)),
                CoreMessagingArgs::Raw(positional_args(data)),
            ),
            Some(method) => {
                let args = match method.enrichment {
                    Some(Enrichment::SetDefaultIsm) => {
                        let call = IMailbox::setDefaultIsmCall::abi_decode(data, true)
                            .map_err(GovernError::abi)?;
                        CoreMessagingArgs::SetDefaultIsm(
                            self.check_default_ism(chain, call._module).await?,
                        )
                    }
                    _ => CoreMessagingArgs::Raw(method.decode_args(data)?),
                };
                (method.signature(), args)
            }
        };

        Ok(DecodedCall::CoreMessagingCall(CoreMessagingCall {
            chain: chain.to_string(),
            to: label("Mailbox", chain, tx.to),
            value: format_native(tx.value, &self.native_symbol(chain)),
            signature,
            args,
        }))
    }

    /// Compare the live config of a proposed default ISM with the expected one
    async fn check_default_ism(&self, chain: &str, module: Address) -> Result<SetDefaultIsmInsight> {
        let expected = self
            .reader
            .collaborators
            .configs
            .expected_security_module(chain)
            .ok_or_else(|| GovernError::MissingExpectedConfig(chain.to_string()))?;
        let derived = self.derive_ism_config(chain, module).await?;

        let insight = if derived.matches(&expected) {
            Insight::matched(module.to_string(), "matches expected ISM config")
        } else {
            warn!(
                chain,
                %module,
                derived = %derived.normalized(),
                expected = %expected.normalized(),
                "Mismatch of ISM config"
            );
            self.anomalies.push(AnomalyRecord::fatal(
                chain,
                Offending::ModuleConfig {
                    module,
                    derived: derived.as_value().clone(),
                    expected: expected.as_value().clone(),
                },
                "Incorrect default ISM being set",
            ));
            Insight::mismatch(module.to_string(), "fatal mismatch of ISM config")
        };

        Ok(SetDefaultIsmInsight { module, insight })
    }

    async fn derive_ism_config(&self, chain: &str, module: Address) -> Result<IsmConfig> {
        let _progress = self.derivations.start(chain);
        let configs = &self.reader.collaborators.configs;
        retry_async(self.retry(), "ISM derivation", || {
            configs.derive_security_module(chain, module)
        })
        .await
    }
}
