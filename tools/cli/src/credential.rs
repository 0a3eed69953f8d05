//! Master password retrieval from the OS credential store.
//!
//! On macOS the password lives in the login keychain as a generic password
//! item, stored base64-encoded. Every failure along the chain degrades to
//! `None` so the caller falls back to an interactive prompt.

use tracing::{debug, warn};

use otpvault_common::{Error, Result};

/// Keychain service name of the stored master password.
const KEYCHAIN_SERVICE: &str = "OTPGenerator";

/// Keychain account name of the stored master password.
const KEYCHAIN_ACCOUNT: &str = "MasterPassword";

/// Look up the master password in the OS credential store.
///
/// Returns `None` when no store is available on this platform or the
/// lookup fails for any reason; the condition is logged, never fatal.
pub fn get_master_password() -> Option<String> {
    match lookup_keychain() {
        Ok(password) => {
            debug!(
                service = KEYCHAIN_SERVICE,
                account = KEYCHAIN_ACCOUNT,
                "master password retrieved from credential store"
            );
            Some(password)
        }
        Err(err) => {
            warn!(%err, "falling back to interactive password prompt");
            None
        }
    }
}

#[cfg(target_os = "macos")]
fn lookup_keychain() -> Result<String> {
    use base64::Engine;
    use std::process::Command;

    let output = Command::new("security")
        .args([
            "find-generic-password",
            "-s",
            KEYCHAIN_SERVICE,
            "-a",
            KEYCHAIN_ACCOUNT,
            "-w",
        ])
        .output()
        .map_err(|e| Error::CredentialUnavailable(format!("could not run security: {}", e)))?;

    if !output.status.success() {
        return Err(Error::CredentialUnavailable(format!(
            "no keychain item for {}/{}",
            KEYCHAIN_SERVICE, KEYCHAIN_ACCOUNT
        )));
    }

    let encoded = String::from_utf8(output.stdout)
        .map_err(|_| Error::CredentialUnavailable("keychain output is not UTF-8".to_string()))?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| {
            Error::CredentialUnavailable("stored password is not valid base64".to_string())
        })?;

    String::from_utf8(decoded).map_err(|_| {
        Error::CredentialUnavailable("decoded password is not valid UTF-8".to_string())
    })
}

#[cfg(not(target_os = "macos"))]
fn lookup_keychain() -> Result<String> {
    Err(Error::CredentialUnavailable(
        "no credential store integration on this platform".to_string(),
    ))
}
