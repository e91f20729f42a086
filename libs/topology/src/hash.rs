//! Content hashing for desired state.
//!
//! Hashes are computed over a canonicalized JSON representation (object
//! keys sorted), so they are stable across field declaration order and
//! formatting. Used to detect when a plan's desired state has changed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TopologyError;

/// A `sha256:`-prefixed hash of a desired-state document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecHash(String);

impl SpecHash {
    /// Computes the hash of any serializable desired-state value.
    pub fn of<T: Serialize>(value: &T) -> Result<Self, TopologyError> {
        // serde_json's map representation sorts keys, so converting to
        // a Value and back canonicalizes object ordering.
        let canonical = serde_json::to_value(value)
            .and_then(|value| serde_json::to_vec(&value))
            .map_err(|e| TopologyError::Serialize(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(Self(format!("sha256:{}", hex::encode(hasher.finalize()))))
    }

    /// The hash string, including the `sha256:` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpecHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_across_key_order() {
        let a = serde_json::json!({"b": 2, "a": 1});
        let b = serde_json::json!({"a": 1, "b": 2});
        assert_eq!(SpecHash::of(&a).unwrap(), SpecHash::of(&b).unwrap());
    }

    #[test]
    fn hash_changes_with_content() {
        let a = serde_json::json!({"port": 3000});
        let b = serde_json::json!({"port": 3001});
        assert_ne!(SpecHash::of(&a).unwrap(), SpecHash::of(&b).unwrap());
    }

    #[test]
    fn hash_has_canonical_form() {
        let hash = SpecHash::of(&serde_json::json!({"a": 1})).unwrap();
        assert!(hash.as_str().starts_with("sha256:"));
        assert_eq!(hash.as_str().len(), "sha256:".len() + 64);
    }
}
