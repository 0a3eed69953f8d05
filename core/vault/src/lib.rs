//! Vault engine for otpvault.
//!
//! This module provides:
//! - The in-memory secret document and its JSON persistence format
//! - [`VaultStore`], the sole owner of the encrypted vault file
//! - [`Session`], the interactive command state machine
//!
//! # Architecture
//! The store sits between the session controller and the crypto layer:
//! every mutation re-encrypts and rewrites the whole file before returning,
//! so a successful call always leaves disk matching memory.

pub mod document;
pub mod session;
pub mod store;

pub use document::VaultDocument;
pub use session::{Command, Console, Dashboard, EntryCodes, Session, SessionState};
pub use store::VaultStore;
