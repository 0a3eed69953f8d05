//! Time-based one-time password engine for otpvault.
//!
//! Implements RFC 6238 TOTP over RFC 4226 HOTP: a 30-second time counter,
//! HMAC-SHA1 over the base32-decoded seed, and dynamic truncation down to a
//! 6-digit decimal code.

pub mod engine;

pub use engine::{
    code_at, current_and_next, current_code, decode_seed, is_valid_seed, seconds_remaining,
    seconds_remaining_at, OtpCodePair, DIGITS, PERIOD,
};
