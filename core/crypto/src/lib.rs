//! Cryptographic primitives for otpvault.
//!
//! This module provides:
//! - Master key derivation using PBKDF2-HMAC-SHA256
//! - Authenticated encryption using XChaCha20-Poly1305
//! - Key types with automatic zeroization
//!
//! # Security Guarantees
//! - Key material is zeroized on drop and never logged
//! - Decryption authenticates before returning plaintext; a wrong key or a
//!   tampered ciphertext is always a hard error, never garbage output

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, KdfParams};
pub use keys::{MasterKey, Salt, KEY_LENGTH};
