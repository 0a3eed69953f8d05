//! Key and salt types with secure memory handling.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the master key in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Symmetric key derived from the user's master password.
///
/// Held only in memory for the lifetime of the session and zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Create a master key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

/// Salt for master key derivation.
///
/// The application unlocks every vault with [`Salt::embedded`], a fixed
/// value baked into the binary. A fixed salt means identical passwords
/// derive identical keys across installations; the constructors below keep
/// the parameter explicit rather than hiding it inside the KDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(Vec<u8>);

impl Salt {
    /// The fixed salt used for vault key derivation.
    pub fn embedded() -> Self {
        Self(b"static_salt_for_key_derivation".to_vec())
    }

    /// Generate a random 32-byte salt.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(salt.to_vec())
    }

    /// Create from explicit bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
