//! Interchain account router decoding
//!
//! Router enrollments are checked against the directory's router for the
//! enrolled domain. `callRemoteWithOverrides` is checked for its router and ISM
//! overrides and for the account it will execute from, then each nested call is
//! read again against the destination chain.

use crate::alloy::{router_matches, word_hex, Address, IInterchainAccountRouter, SolCall, B256};
use crate::methods::{positional_args, Enrichment};
use crate::reader::{label, AuditSession};
use futures::future::join_all;
use govread_core::{
    format_native, retry_async, AnomalyRecord, ContractName, DecodedCall, Destination, Domain,
    GovernError, Insight, Offending, RemoteAccountArgs, RemoteAccountCall, RemoteAccountKey,
    RemoteCallInsight, Result, RouterEnrollment, Transaction,
};
use tracing::{debug, warn};

impl AuditSession<'_> {
    pub(crate) async fn read_ica_transaction(
        &self,
        chain: &str,
        tx: &Transaction,
    ) -> Result<DecodedCall> {
        let data = tx.payload().ok_or(GovernError::MissingPayload("ICA"))?;
        let (method, selector) = self.reader.interfaces.ica_router.lookup(data)?;

        let (signature, args) = match method {
            None => (
                format!("0x{}", hex::encode(selector)),
                RemoteAccountArgs::Raw(positional_args(data)),
            ),
            Some(method) => {
                let args = match method.enrichment {
                    Some(Enrichment::RouterEnrollment) => {
                        let call = IInterchainAccountRouter::enrollRemoteRouterCall::abi_decode(data, true)
                            .map_err(GovernError::abi)?;
                        RemoteAccountArgs::RouterEnrollments(vec![
                            self.check_router_enrollment(chain, call._domain, call._router)
                        ])
                    }
                    Some(Enrichment::RouterEnrollments) => {
                        let call = IInterchainAccountRouter::enrollRemoteRoutersCall::abi_decode(data, true)
                            .map_err(GovernError::abi)?;
                        if call._domains.len() != call._addresses.len() {
                            return Err(GovernError::abi(format!(
                                "{} domains but {} routers",
                                call._domains.len(),
                                call._addresses.len()
                            )));
                        }
                        RemoteAccountArgs::RouterEnrollments(
                            call._domains
                                .iter()
                                .zip(call._addresses.iter())
                                .map(|(domain, router)| {
                                    self.check_router_enrollment(chain, *domain, *router)
                                })
                                .collect(),
                        )
                    }
                    Some(Enrichment::RemoteCallWithOverrides) => {
                        let call =
                            IInterchainAccountRouter::callRemoteWithOverridesCall::abi_decode(data, true)
                                .map_err(GovernError::abi)?;
                        RemoteAccountArgs::RemoteCall(Box::new(self.read_remote_call(chain, call).await?))
                    }
                    Some(Enrichment::SetDefaultIsm) | None => {
                        RemoteAccountArgs::Raw(method.decode_args(data)?)
                    }
                };
                (method.signature(), args)
            }
        };

        Ok(DecodedCall::RemoteAccountCall(RemoteAccountCall {
            chain: chain.to_string(),
            to: label("ICA Router", chain, tx.to),
            value: format_native(tx.value, &self.native_symbol(chain)),
            signature,
            args,
        }))
    }

    fn expected_router(&self, remote: Option<&str>) -> Option<Address> {
        remote.and_then(|chain| {
            self.reader
                .collaborators
                .directory
                .address_of(chain, ContractName::InterchainAccountRouter)
        })
    }

    fn check_router_enrollment(&self, chain: &str, domain: Domain, router: B256) -> RouterEnrollment {
        let remote = self.reader.collaborators.resolver.chain_of(domain);
        let expected = self.expected_router(remote.as_deref());
        let insight = router_insight(router, expected, domain, remote.as_deref());

        if !insight.is_match() {
            self.anomalies.push(
                AnomalyRecord::fatal(
                    chain,
                    Offending::Field {
                        field: "router".to_string(),
                        actual: word_hex(&router),
                        expected: expected.map(|a| a.to_string()),
                    },
                    "Incorrect router getting enrolled",
                )
                .with_remote(domain, remote.as_deref()),
            );
        }

        RouterEnrollment {
            domain,
            chain: remote,
            router,
            insight,
        }
    }

    async fn read_remote_call(
        &self,
        chain: &str,
        call: IInterchainAccountRouter::callRemoteWithOverridesCall,
    ) -> Result<RemoteCallInsight> {
        let domain = call._destination;
        let collaborators = &self.reader.collaborators;
        let remote = collaborators
            .resolver
            .chain_of(domain)
            .ok_or(GovernError::UnknownDomain(domain))?;

        let expected_router = self.expected_router(Some(&remote));
        let router = router_insight(call._router, expected_router, domain, Some(&remote));
        if !router.is_match() {
            self.push_remote_anomaly(
                chain,
                domain,
                &remote,
                Offending::Field {
                    field: "router".to_string(),
                    actual: word_hex(&call._router),
                    expected: expected_router.map(|a| a.to_string()),
                },
                "Incorrect router in ICA call",
            );
        }

        let ism = if call._ism == B256::ZERO {
            Insight::matched(word_hex(&call._ism), "uses the default ISM")
        } else {
            self.push_remote_anomaly(
                chain,
                domain,
                &remote,
                Offending::Field {
                    field: "ism".to_string(),
                    actual: word_hex(&call._ism),
                    expected: Some(word_hex(&B256::ZERO)),
                },
                "Incorrect ISM in ICA call, expected zero hash",
            );
            Insight::mismatch(word_hex(&call._ism), "fatal mismatch, expected zero hash")
        };

        let destination_ica = self.check_destination_account(chain, domain, &remote, &call).await;

        let nested: Vec<Transaction> = call
            ._calls
            .iter()
            .map(|inner| Transaction {
                to: Some(Address::from_word(inner.to)),
                value: inner.value,
                data: Some(inner.data.clone()),
            })
            .collect();
        let calls = join_all(nested.iter().map(|tx| self.read(&remote, tx))).await;

        Ok(RemoteCallInsight {
            destination: Destination {
                domain,
                chain: remote.clone(),
            },
            router,
            ism,
            destination_ica,
            calls,
        })
    }

    /// Compare the account the call will execute from with the registered one
    ///
    /// A failed derivation only fails this check; the rest of the call is
    /// still validated.
    async fn check_destination_account(
        &self,
        chain: &str,
        domain: Domain,
        remote: &str,
        call: &IInterchainAccountRouter::callRemoteWithOverridesCall,
    ) -> Insight {
        let collaborators = &self.reader.collaborators;
        let owner = &self.reader.config.owner;
        let key = RemoteAccountKey {
            owner: owner.address,
            origin_chain: owner.chain.clone(),
            router_override: call._router,
            ism_override: call._ism,
        };
        let accounts = &collaborators.accounts;
        let derived = retry_async(self.retry(), "interchain account derivation", || {
            accounts.expected_remote_account(remote, &key)
        })
        .await;

        let expected_ica = collaborators
            .directory
            .address_of(remote, ContractName::GovernanceAccount);
        let (insight, actual) = match derived {
            Ok(derived) => {
                debug!(chain, remote, %derived, "Derived destination account");
                let insight = match expected_ica {
                    Some(expected) if expected == derived => {
                        Insight::matched(derived.to_string(), "matches expected ICA")
                    }
                    Some(expected) => Insight::mismatch(
                        derived.to_string(),
                        format!("fatal mismatch, expected {}", expected),
                    ),
                    None => Insight::mismatch(
                        derived.to_string(),
                        format!("fatal mismatch, no governance account registered for {}", remote),
                    ),
                };
                (insight, derived.to_string())
            }
            Err(err) => {
                warn!(chain, remote, error = %err, "Failed to derive destination account");
                let subject = expected_ica
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                (
                    Insight::mismatch(subject, format!("fatal mismatch, derivation failed: {}", err)),
                    format!("derivation failed: {}", err),
                )
            }
        };

        if !insight.is_match() {
            self.push_remote_anomaly(
                chain,
                domain,
                remote,
                Offending::Field {
                    field: "destination_ica".to_string(),
                    actual,
                    expected: expected_ica.map(|a| a.to_string()),
                },
                "Incorrect destination ICA in ICA call",
            );
        }
        insight
    }

    fn push_remote_anomaly(
        &self,
        chain: &str,
        domain: Domain,
        remote: &str,
        offending: Offending,
        description: &str,
    ) {
        self.anomalies.push(
            AnomalyRecord::fatal(chain, offending, description).with_remote(domain, Some(remote)),
        );
    }
}

fn router_insight(
    router: B256,
    expected: Option<Address>,
    domain: Domain,
    remote: Option<&str>,
) -> Insight {
    let subject = word_hex(&router);
    match (expected, remote) {
        (Some(expected), _) if router_matches(expected, router) => {
            Insight::matched(subject, "matches expected router from artifacts")
        }
        (Some(expected), _) => {
            Insight::mismatch(subject, format!("fatal mismatch, expected {}", expected))
        }
        (None, Some(chain)) => Insight::mismatch(
            subject,
            format!("fatal mismatch, no router registered for {}", chain),
        ),
        (None, None) => Insight::mismatch(
            subject,
            format!("fatal mismatch, no chain registered for domain {}", domain),
        ),
    }
}
