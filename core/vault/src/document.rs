//! The in-memory secret collection and its serialized form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use otpvault_common::{Error, Result};

/// Mapping from entry name to base32 seed.
///
/// Persisted as a plain JSON object (`{"name": "seed", ...}`), so the
/// document round-trips losslessly through serialize → encrypt → decrypt →
/// parse. Names are unique and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultDocument {
    entries: BTreeMap<String, String>,
}

impl VaultDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, name: impl Into<String>, seed: impl Into<String>) {
        self.entries.insert(name.into(), seed.into());
    }

    /// Remove an entry, reporting whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Look up the seed stored under a name.
    pub fn seed(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// All entry names.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the persisted byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse a decrypted payload. Failure means the vault decrypted but
    /// does not contain a valid document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::CorruptDocument(e.to_string()))
    }

    /// Pretty-printed JSON for the inspect/dump path.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn serializes_as_plain_json_object() {
        let mut doc = VaultDocument::new();
        doc.insert("totp1", "JBSWY3DPEHPK3PXP");

        let json = String::from_utf8(doc.to_bytes().unwrap()).unwrap();
        assert_eq!(json, r#"{"totp1":"JBSWY3DPEHPK3PXP"}"#);
    }

    #[test]
    fn parses_a_plain_json_object() {
        let doc = VaultDocument::from_bytes(br#"{"a":"SEED1","b":"SEED2"}"#).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.seed("a"), Some("SEED1"));
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [&b"[1,2,3]"[..], b"\"text\"", b"not json at all", b""] {
            assert!(matches!(
                VaultDocument::from_bytes(payload),
                Err(Error::CorruptDocument(_))
            ));
        }
    }

    #[test]
    fn insert_overwrites_existing_name() {
        let mut doc = VaultDocument::new();
        doc.insert("totp1", "OLD");
        doc.insert("totp1", "NEW");

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.seed("totp1"), Some("NEW"));
    }

    #[test]
    fn remove_reports_presence() {
        let mut doc = VaultDocument::new();
        doc.insert("totp1", "SEED");

        assert!(doc.remove("totp1"));
        assert!(!doc.remove("totp1"));
        assert!(doc.is_empty());
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut doc = VaultDocument::new();
        doc.insert("GitHub", "SEED1");
        doc.insert("github", "SEED2");

        assert_eq!(doc.len(), 2);
    }

    proptest! {
        #[test]
        fn roundtrips_through_bytes(
            entries in proptest::collection::btree_map("[a-zA-Z0-9 ]{1,16}", "[A-Z2-7]{8,32}", 0..8)
        ) {
            let mut doc = VaultDocument::new();
            for (name, seed) in &entries {
                doc.insert(name.clone(), seed.clone());
            }
            let restored = VaultDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(restored, doc);
        }
    }
}
