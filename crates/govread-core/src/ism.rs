//! Security-module configuration and its normalized comparison
//!
//! A config is kept as structured JSON because derived and expected forms come
//! from different sources (on-chain derivation vs. a maintained table) and
//! differ in incidental ways: deployed `address` fields, hex casing, stray
//! whitespace, the order of validator and module lists. Normalization removes
//! those differences before the deep equality check.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that only exist on derived configs and carry no policy
const IGNORED_KEYS: &[&str] = &["address", "ownerOverrides"];

/// A structured security-module configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsmConfig(Value);

impl IsmConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Canonical form used for comparison
    pub fn normalized(&self) -> Value {
        normalize(&self.0)
    }

    /// Structural equality after normalization
    pub fn matches(&self, other: &IsmConfig) -> bool {
        self.normalized() == other.normalized()
    }
}

impl From<Value> for IsmConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_lowercase()),
        Value::Array(items) => {
            let mut items: Vec<Value> = items.iter().map(normalize).collect();
            items.sort_by_cached_key(|item| item.to_string());
            Value::Array(items)
        }
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !IGNORED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), normalize(value)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_matches_expected_despite_incidental_differences() {
        let derived = IsmConfig::new(json!({
            "address": "0x1111111111111111111111111111111111111111",
            "type": "staticAggregationIsm",
            "threshold": 2,
            "modules": [
                {
                    "address": "0x2222222222222222222222222222222222222222",
                    "type": "merkleRootMultisigIsm",
                    "validators": ["0xBBBB000000000000000000000000000000000000", "0xaaaa000000000000000000000000000000000000"],
                    "threshold": 1
                },
                { "type": "messageIdMultisigIsm", "validators": ["0xaaaa000000000000000000000000000000000000"], "threshold": 1 }
            ]
        }));
        let expected = IsmConfig::new(json!({
            "threshold": 2,
            "modules": [
                { "threshold": 1, "type": "messageIdMultisigIsm", "validators": [" 0xAAAA000000000000000000000000000000000000"] },
                {
                    "threshold": 1,
                    "type": "merkleRootMultisigIsm",
                    "validators": ["0xaaaa000000000000000000000000000000000000", "0xbbbb000000000000000000000000000000000000"]
                }
            ],
            "type": "staticAggregationIsm"
        }));
        assert!(derived.matches(&expected));
    }

    #[test]
    fn test_threshold_difference_is_detected() {
        let derived = IsmConfig::new(json!({ "type": "merkleRootMultisigIsm", "validators": ["0xaa"], "threshold": 1 }));
        let expected = IsmConfig::new(json!({ "type": "merkleRootMultisigIsm", "validators": ["0xaa"], "threshold": 2 }));
        assert!(!derived.matches(&expected));
    }

    #[test]
    fn test_extra_validator_is_detected() {
        let derived = IsmConfig::new(json!({ "validators": ["0xaa", "0xbb"] }));
        let expected = IsmConfig::new(json!({ "validators": ["0xaa"] }));
        assert!(!derived.matches(&expected));
    }
}
