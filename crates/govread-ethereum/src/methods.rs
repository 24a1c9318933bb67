//! Method tables for the governed contract interfaces
//!
//! Each table maps a 4-byte selector to its parsed function and, for the
//! entrypoints that carry security-relevant arguments, the enrichment to apply.
//! Methods without an enrichment are still decoded into named arguments;
//! selectors missing from a table fall back to positional 32-byte words.

use crate::alloy::selector_of;
use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::Function;
use govread_core::{DecodedArg, GovernError, Result};
use std::collections::HashMap;

/// Validation applied on top of plain argument decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrichment {
    /// `enrollRemoteRouter(uint32,bytes32)`
    RouterEnrollment,
    /// `enrollRemoteRouters(uint32[],bytes32[])`
    RouterEnrollments,
    /// `callRemoteWithOverrides(...)`
    RemoteCallWithOverrides,
    /// `setDefaultIsm(address)`
    SetDefaultIsm,
}

const ICA_ROUTER_METHODS: &[(&str, Option<Enrichment>)] = &[
    (
        "function enrollRemoteRouter(uint32 _domain, bytes32 _router)",
        Some(Enrichment::RouterEnrollment),
    ),
    (
        "function enrollRemoteRouters(uint32[] _domains, bytes32[] _addresses)",
        Some(Enrichment::RouterEnrollments),
    ),
    (
        "function callRemoteWithOverrides(uint32 _destination, bytes32 _router, bytes32 _ism, (bytes32,uint256,bytes)[] _calls)",
        Some(Enrichment::RemoteCallWithOverrides),
    ),
    (
        "function callRemote(uint32 _destination, (bytes32,uint256,bytes)[] _calls)",
        None,
    ),
    (
        "function enrollRemoteRouterAndIsm(uint32 _destination, bytes32 _router, bytes32 _ism)",
        None,
    ),
    (
        "function enrollRemoteRouterAndIsms(uint32[] _destinations, bytes32[] _routers, bytes32[] _isms)",
        None,
    ),
    ("function unenrollRemoteRouter(uint32 _domain)", None),
    ("function unenrollRemoteRouters(uint32[] _domains)", None),
    ("function setHook(address _hook)", None),
    ("function setInterchainSecurityModule(address _module)", None),
    ("function transferOwnership(address newOwner)", None),
    ("function renounceOwnership()", None),
];

const MAILBOX_METHODS: &[(&str, Option<Enrichment>)] = &[
    (
        "function setDefaultIsm(address _module)",
        Some(Enrichment::SetDefaultIsm),
    ),
    ("function setDefaultHook(address _hook)", None),
    ("function setRequiredHook(address _hook)", None),
    ("function transferOwnership(address newOwner)", None),
    ("function renounceOwnership()", None),
];

/// A known method of an interface
#[derive(Debug, Clone)]
pub struct Method {
    pub function: Function,
    pub enrichment: Option<Enrichment>,
}

impl Method {
    /// Canonical signature, e.g. `setDefaultIsm(address)`
    pub fn signature(&self) -> String {
        self.function.signature()
    }

    /// Decode call data (selector included) into named arguments
    pub fn decode_args(&self, data: &[u8]) -> Result<Vec<DecodedArg>> {
        let body = data
            .get(4..)
            .ok_or_else(|| GovernError::abi("call data shorter than a selector"))?;
        let values = self
            .function
            .abi_decode_input(body, true)
            .map_err(GovernError::abi)?;

        Ok(self
            .function
            .inputs
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(i, (param, value))| DecodedArg {
                name: if param.name.is_empty() {
                    format!("arg{}", i)
                } else {
                    param.name.clone()
                },
                kind: param.selector_type().into_owned(),
                value: format_value(value),
            })
            .collect())
    }
}

/// Selector-indexed methods of one interface
#[derive(Debug, Clone)]
pub struct MethodTable {
    name: &'static str,
    methods: HashMap<[u8; 4], Method>,
}

impl MethodTable {
    fn parse(name: &'static str, entries: &[(&str, Option<Enrichment>)]) -> Result<Self> {
        let mut methods = HashMap::with_capacity(entries.len());
        for (signature, enrichment) in entries {
            let function = Function::parse(signature).map_err(|e| {
                GovernError::abi(format!("invalid {} method `{}`: {}", name, signature, e))
            })?;
            methods.insert(
                function.selector().0,
                Method {
                    function,
                    enrichment: *enrichment,
                },
            );
        }
        Ok(Self { name, methods })
    }

    /// Interchain account router methods
    pub fn ica_router() -> Result<Self> {
        Self::parse("InterchainAccountRouter", ICA_ROUTER_METHODS)
    }

    /// Mailbox methods
    pub fn mailbox() -> Result<Self> {
        Self::parse("Mailbox", MAILBOX_METHODS)
    }

    pub fn get(&self, selector: [u8; 4]) -> Option<&Method> {
        self.methods.get(&selector)
    }

    /// Look up the method addressed by call data
    pub fn lookup(&self, data: &[u8]) -> Result<(Option<&Method>, [u8; 4])> {
        let selector = selector_of(data)
            .ok_or_else(|| GovernError::abi(format!("{} call data shorter than a selector", self.name)))?;
        Ok((self.get(selector), selector))
    }
}

/// Both governed interfaces, parsed once per reader
#[derive(Debug, Clone)]
pub struct Interfaces {
    pub ica_router: MethodTable,
    pub mailbox: MethodTable,
}

impl Interfaces {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ica_router: MethodTable::ica_router()?,
            mailbox: MethodTable::mailbox()?,
        })
    }
}

/// Format a decoded ABI value for display
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Address(address) => address.to_string(),
        DynSolValue::Bool(flag) => flag.to_string(),
        DynSolValue::Int(int, _) => int.to_string(),
        DynSolValue::Uint(uint, _) => uint.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", hex::encode(&word.as_slice()[..*size]))
        }
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            format!("[{}]", join_values(items))
        }
        DynSolValue::Tuple(items) => format!("({})", join_values(items)),
        other => format!("{:?}", other),
    }
}

fn join_values(items: &[DynSolValue]) -> String {
    items.iter().map(format_value).collect::<Vec<_>>().join(", ")
}

/// Split the arguments of an unrecognized call into 32-byte words
///
/// Trailing bytes that do not fill a word are reported as a final `tail` argument.
pub fn positional_args(data: &[u8]) -> Vec<DecodedArg> {
    let body = data.get(4..).unwrap_or_default();
    body.chunks(32)
        .enumerate()
        .map(|(i, chunk)| {
            if chunk.len() == 32 {
                DecodedArg {
                    name: format!("arg{}", i),
                    kind: "bytes32".to_string(),
                    value: format!("0x{}", hex::encode(chunk)),
                }
            } else {
                DecodedArg {
                    name: "tail".to_string(),
                    kind: "bytes".to_string(),
                    value: format!("0x{}", hex::encode(chunk)),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloy::{
        Address, IInterchainAccountRouter, IMailbox, SolCall, B256,
    };

    #[test]
    fn test_enriched_selectors_agree_with_typed_calls() {
        let interfaces = Interfaces::new().unwrap();
        let expectations = [
            (
                IInterchainAccountRouter::enrollRemoteRouterCall::SELECTOR,
                Enrichment::RouterEnrollment,
            ),
            (
                IInterchainAccountRouter::enrollRemoteRoutersCall::SELECTOR,
                Enrichment::RouterEnrollments,
            ),
            (
                IInterchainAccountRouter::callRemoteWithOverridesCall::SELECTOR,
                Enrichment::RemoteCallWithOverrides,
            ),
        ];
        for (selector, enrichment) in expectations {
            let method = interfaces.ica_router.get(selector).unwrap();
            assert_eq!(method.enrichment, Some(enrichment));
        }

        let set_default = interfaces
            .mailbox
            .get(IMailbox::setDefaultIsmCall::SELECTOR)
            .unwrap();
        assert_eq!(set_default.enrichment, Some(Enrichment::SetDefaultIsm));
        assert_eq!(set_default.signature(), "setDefaultIsm(address)");
    }

    #[test]
    fn test_named_args_for_plain_method() {
        let interfaces = Interfaces::new().unwrap();
        let hook = Address::repeat_byte(0x0b);
        let mut data = Function::parse("function setDefaultHook(address _hook)")
            .unwrap()
            .selector()
            .to_vec();
        data.extend_from_slice(hook.into_word().as_slice());

        let (method, _) = interfaces.mailbox.lookup(&data).unwrap();
        let args = method.unwrap().decode_args(&data).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].name, "_hook");
        assert_eq!(args[0].kind, "address");
        assert_eq!(args[0].value, hook.to_string());
    }

    #[test]
    fn test_tuple_array_formatting() {
        let call = IInterchainAccountRouter::enrollRemoteRoutersCall {
            _domains: vec![1, 137],
            _addresses: vec![B256::repeat_byte(0x01), B256::ZERO],
        };
        let data = call.abi_encode();
        let interfaces = Interfaces::new().unwrap();
        let method = interfaces.ica_router.get(IInterchainAccountRouter::enrollRemoteRoutersCall::SELECTOR).unwrap();
        let args = method.decode_args(&data).unwrap();
        assert_eq!(args[0].value, "[1, 137]");
        assert_eq!(args[1].kind, "bytes32[]");
        assert!(args[1].value.starts_with("[0x0101"));
    }

    #[test]
    fn test_positional_words() {
        let mut data = vec![0xaa, 0xbb, 0xcc, 0xdd];
        data.extend_from_slice(&[0x11; 32]);
        data.extend_from_slice(&[0x22; 3]);
        let args = positional_args(&data);
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name, "arg0");
        assert_eq!(args[0].value, format!("0x{}", "11".repeat(32)));
        assert_eq!(args[1].name, "tail");
        assert_eq!(args[1].value, "0x222222");
    }

    #[test]
    fn test_short_call_data_is_an_abi_error() {
        let interfaces = Interfaces::new().unwrap();
        assert!(matches!(
            interfaces.ica_router.lookup(&[0x01, 0x02]),
            Err(GovernError::AbiDecode(_))
        ));
    }
}
