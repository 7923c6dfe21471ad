//! Storage key derivation.
//!
//! A `StorageKey` is the lowercase-hex SHA-256 digest of a human-readable
//! identifier. The same key addresses the record in the remote backend and
//! names the local cache file, so it must be deterministic and safe to use
//! as a file name.

use std::fmt;

use sha2::{Digest, Sha256};

/// Opaque storage key derived from an identifier.
///
/// The private field ensures a key can only be obtained through
/// [`hash_key`], so every key in the system is a well-formed digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the storage key for an identifier.
///
/// Deterministic and pure: the same identifier always yields the same key,
/// and distinct identifiers collide only with negligible probability.
pub fn hash_key(identifier: &str) -> StorageKey {
    let digest = Sha256::digest(identifier.as_bytes());
    StorageKey(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hash_key_is_deterministic() {
        assert_eq!(hash_key("a"), hash_key("a"));
        assert_eq!(hash_key(""), hash_key(""));
    }

    #[test]
    fn test_hash_key_known_digest() {
        // SHA-256("a"), independently verifiable.
        assert_eq!(
            hash_key("a").as_str(),
            "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
        );
    }

    #[test]
    fn test_hash_key_shape() {
        let key = hash_key("some slot");
        assert_eq!(key.as_str().len(), 64);
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_distinct_identifiers_yield_distinct_keys() {
        let ids: Vec<String> = (0..1000).map(|i| format!("slot-{}", i)).collect();
        let mut keys: Vec<String> = ids
            .iter()
            .map(|id| hash_key(id).as_str().to_string())
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), ids.len());
    }

    proptest! {
        #[test]
        fn prop_hash_key_idempotent(id in ".*") {
            prop_assert_eq!(hash_key(&id), hash_key(&id));
        }

        #[test]
        fn prop_distinct_inputs_differ(a in ".*", b in ".*") {
            prop_assume!(a != b);
            prop_assert_ne!(hash_key(&a), hash_key(&b));
        }
    }
}
