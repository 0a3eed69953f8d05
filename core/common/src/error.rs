//! Common error types for otpvault.

use thiserror::Error;

/// Top-level error type for otpvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Cryptographic operation failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// The vault file failed authenticated decryption. Either the master
    /// password is wrong or the file has been tampered with or truncated.
    #[error("Wrong master password or corrupt vault file")]
    WrongPasswordOrCorruptFile,

    /// The vault decrypted but the payload is not a valid document.
    #[error("Corrupt vault document: {0}")]
    CorruptDocument(String),

    /// A secret seed was rejected because no code could be computed from it.
    #[error("Invalid secret format: {0}")]
    InvalidSeedFormat(String),

    /// Writing the vault file failed. The in-memory state is kept; the next
    /// mutation retries the write.
    #[error("Failed to persist vault: {0}")]
    PersistFailure(String),

    /// The external credential source could not supply a master password.
    #[error("Credential source unavailable: {0}")]
    CredentialUnavailable(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the session must terminate when this error surfaces.
    ///
    /// Unlock failures are fatal; everything reachable from an unlocked
    /// session is reported to the user and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::WrongPasswordOrCorruptFile | Error::CorruptDocument(_)
        )
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_failures_are_fatal() {
        assert!(Error::WrongPasswordOrCorruptFile.is_fatal());
        assert!(Error::CorruptDocument("not an object".into()).is_fatal());
    }

    #[test]
    fn session_errors_are_recoverable() {
        assert!(!Error::InvalidSeedFormat("bad base32".into()).is_fatal());
        assert!(!Error::PersistFailure("disk full".into()).is_fatal());
        assert!(!Error::CredentialUnavailable("no keychain".into()).is_fatal());
    }
}
