//! The annotated call tree returned by the reader
//!
//! `DecodedCall` is a closed set of variants so every consumer handles each
//! classification explicitly. Batch calls and remote calls carry child nodes;
//! all other variants are leaves.

use crate::insight::{Insight, Verdict};
use crate::types::{ChainName, Classification, DecodedArg, Domain, OperationKind, Transaction};
use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// One node of the decoded call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedCall {
    /// Call to the interchain account router
    RemoteAccountCall(RemoteAccountCall),
    /// Call to the mailbox
    CoreMessagingCall(CoreMessagingCall),
    /// Call to the batch wrapper
    BatchCall(BatchCall),
    /// Unclassified or undecodable call
    Unknown(UnknownCall),
}

impl DecodedCall {
    /// The classification this node was decoded under
    pub fn classification(&self) -> Classification {
        match self {
            DecodedCall::RemoteAccountCall(_) => Classification::RemoteAccount,
            DecodedCall::CoreMessagingCall(_) => Classification::CoreMessaging,
            DecodedCall::BatchCall(_) => Classification::Batch,
            DecodedCall::Unknown(_) => Classification::Unknown,
        }
    }

    /// Chain the call executes on
    pub fn chain(&self) -> &str {
        match self {
            DecodedCall::RemoteAccountCall(call) => &call.chain,
            DecodedCall::CoreMessagingCall(call) => &call.chain,
            DecodedCall::BatchCall(call) => &call.chain,
            DecodedCall::Unknown(call) => &call.chain,
        }
    }

    /// Direct child calls, in execution order
    pub fn children(&self) -> Vec<&DecodedCall> {
        match self {
            DecodedCall::BatchCall(batch) => {
                batch.multisends.iter().map(|entry| &entry.decoded).collect()
            }
            DecodedCall::RemoteAccountCall(RemoteAccountCall {
                args: RemoteAccountArgs::RemoteCall(remote),
                ..
            }) => remote.calls.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Insights attached directly to this node
    pub fn insights(&self) -> Vec<&Insight> {
        match self {
            DecodedCall::RemoteAccountCall(call) => match &call.args {
                RemoteAccountArgs::Raw(_) => Vec::new(),
                RemoteAccountArgs::RouterEnrollments(enrollments) => {
                    enrollments.iter().map(|e| &e.insight).collect()
                }
                RemoteAccountArgs::RemoteCall(remote) => {
                    vec![&remote.router, &remote.ism, &remote.destination_ica]
                }
            },
            DecodedCall::CoreMessagingCall(call) => match &call.args {
                CoreMessagingArgs::Raw(_) => Vec::new(),
                CoreMessagingArgs::SetDefaultIsm(ism) => vec![&ism.insight],
            },
            DecodedCall::BatchCall(_) | DecodedCall::Unknown(_) => Vec::new(),
        }
    }

    /// Number of `Mismatch` verdicts anywhere in the subtree
    pub fn mismatches(&self) -> usize {
        let own = self
            .insights()
            .iter()
            .filter(|insight| insight.verdict == Verdict::Mismatch)
            .count();
        own + self.children().iter().map(|c| c.mismatches()).sum::<usize>()
    }
}

/// Call to the interchain account router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAccountCall {
    pub chain: ChainName,
    /// Target label, e.g. `ICA Router (ethereum 0x…)`
    pub to: String,
    /// Native value, formatted with the chain's symbol
    pub value: String,
    /// Function signature or hex selector when unrecognized
    pub signature: String,
    pub args: RemoteAccountArgs,
}

/// Arguments of a router call, enriched for known mutating methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteAccountArgs {
    /// Named (or positional) arguments without further checks
    Raw(Vec<DecodedArg>),
    /// One entry per enrolled `(domain, router)` pair
    RouterEnrollments(Vec<RouterEnrollment>),
    /// `callRemoteWithOverrides` with its nested calls
    RemoteCall(Box<RemoteCallInsight>),
}

/// A router about to be enrolled for a remote domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterEnrollment {
    pub domain: Domain,
    /// Chain resolved from the domain, if any
    pub chain: Option<ChainName>,
    /// Router exactly as encoded
    pub router: B256,
    pub insight: Insight,
}

/// Destination of a remote call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub domain: Domain,
    pub chain: ChainName,
}

/// Validation of a `callRemoteWithOverrides` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteCallInsight {
    pub destination: Destination,
    /// Router override check
    pub router: Insight,
    /// Security-module override check
    pub ism: Insight,
    /// Derived interchain account check
    pub destination_ica: Insight,
    /// Nested calls decoded against the destination chain
    pub calls: Vec<DecodedCall>,
}

/// Call to the mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreMessagingCall {
    pub chain: ChainName,
    /// Target label, e.g. `Mailbox (ethereum 0x…)`
    pub to: String,
    pub value: String,
    pub signature: String,
    pub args: CoreMessagingArgs,
}

/// Arguments of a mailbox call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreMessagingArgs {
    Raw(Vec<DecodedArg>),
    SetDefaultIsm(SetDefaultIsmInsight),
}

/// Validation of a new default security module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDefaultIsmInsight {
    pub module: Address,
    pub insight: Insight,
}

/// Call to the batch wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCall {
    pub chain: ChainName,
    /// Target label, e.g. `MultiSendCallOnly (ethereum 0x…)`
    pub to: String,
    /// Sub-calls in on-chain order
    pub multisends: Vec<MultiSendEntry>,
}

/// One decoded sub-call of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSendEntry {
    pub chain: ChainName,
    /// Position within the batch
    pub index: usize,
    pub value: String,
    pub operation: OperationKind,
    pub decoded: DecodedCall,
}

/// A call that could not be classified or decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownCall {
    pub chain: ChainName,
    pub transaction: Transaction,
    /// Why the call is unknown
    pub insight: String,
}
