//! Common types shared across otpvault modules.
//!
//! This crate holds the error taxonomy used by every other crate in the
//! workspace, so that callers can distinguish recoverable conditions from
//! fatal ones without matching on message text.

pub mod error;

pub use error::{Error, Result};
