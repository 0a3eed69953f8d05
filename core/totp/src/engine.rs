//! Code generation — RFC 6238 (TOTP) over RFC 4226 (HOTP).

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha1::Sha1;

use otpvault_common::{Error, Result};

/// Length of a code window in seconds.
pub const PERIOD: u64 = 30;

/// Number of decimal digits in a code.
pub const DIGITS: usize = 6;

/// Codes for the current window and the one that follows it.
///
/// `next` previews the code that becomes active at the next 30-second
/// boundary, independent of how many seconds remain in the current window.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCodePair {
    pub current: String,
    pub next: String,
}

/// Decode a base32 seed into HMAC key bytes.
///
/// Whitespace is stripped and case is ignored; missing `=` padding is
/// tolerated. Anything else that is not RFC 4648 base32 is rejected.
pub fn decode_seed(seed: &str) -> Result<Vec<u8>> {
    let normalized: String = seed
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    let unpadded = normalized.trim_end_matches('=');

    if unpadded.is_empty() {
        return Err(Error::InvalidSeedFormat("seed is empty".to_string()));
    }

    base32::decode(base32::Alphabet::Rfc4648 { padding: false }, unpadded)
        .ok_or_else(|| Error::InvalidSeedFormat("seed is not valid base32".to_string()))
}

/// Compute the 6-digit code for a seed at a given unix timestamp.
///
/// T = floor(unix_seconds / 30); the code is the RFC 4226 dynamic
/// truncation of HMAC-SHA1(seed, T), zero-padded to 6 digits. Stable for
/// the whole 30-second window containing `unix_seconds`.
pub fn code_at(seed: &str, unix_seconds: u64) -> Result<String> {
    let key = decode_seed(seed)?;
    let counter = unix_seconds / PERIOD;

    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|_| Error::InvalidSeedFormat("seed is unusable as an HMAC key".to_string()))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation per RFC 4226 §5.3
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    Ok(format!("{:0width$}", binary % 1_000_000, width = DIGITS))
}

/// Compute the code for the current wall-clock window.
pub fn current_code(seed: &str) -> Result<String> {
    code_at(seed, now_unix())
}

/// Compute the current code and the next window's code.
pub fn current_and_next(seed: &str) -> Result<OtpCodePair> {
    let now = now_unix();
    Ok(OtpCodePair {
        current: code_at(seed, now)?,
        next: code_at(seed, now + PERIOD)?,
    })
}

/// Whether a seed can produce a code right now.
///
/// This is the acceptance test applied when a secret is added to the vault.
pub fn is_valid_seed(seed: &str) -> bool {
    current_code(seed).is_ok()
}

/// Seconds until the next 30-second boundary, for a given timestamp.
/// Yields 30 exactly on a boundary.
pub fn seconds_remaining_at(unix_seconds: u64) -> u64 {
    PERIOD - unix_seconds % PERIOD
}

/// Seconds until the next 30-second boundary, from the wall clock.
pub fn seconds_remaining() -> u64 {
    seconds_remaining_at(now_unix())
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
