//! Master key derivation using PBKDF2-HMAC-SHA256.
//!
//! An iteration-heavy, memory-light KDF: deriving a key is deliberately slow
//! so offline brute-forcing of the vault file stays expensive, while the
//! same password and salt always reproduce the same key across sessions.

use serde::{Deserialize, Serialize};

use crate::keys::{MasterKey, Salt, KEY_LENGTH};

/// Parameters for PBKDF2 key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Number of PBKDF2 iterations.
    pub iterations: u32,
}

impl KdfParams {
    /// Parameters used by the application: 100 000 iterations.
    pub fn standard() -> Self {
        Self {
            iterations: 100_000,
        }
    }

    /// Reduced iteration count for tests, where derivation speed matters
    /// more than brute-force resistance.
    pub fn fast_insecure() -> Self {
        Self { iterations: 1_000 }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derive a master key from a password and salt.
///
/// Deterministic: the same password and salt always yield the same key,
/// which is what lets a vault unlock across sessions. There is no error
/// path; any input, including an empty password, produces a usable key.
/// An empty password is a weak key, not an invalid one.
pub fn derive_key(password: &[u8], salt: &Salt, params: &KdfParams) -> MasterKey {
    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(
        password,
        salt.as_bytes(),
        params.iterations,
        &mut key_bytes,
    );
    MasterKey::from_bytes(key_bytes)
}
