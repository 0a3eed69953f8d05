//! Encrypted vault persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use otpvault_common::{Error, Result};
use otpvault_crypto::{aead, MasterKey};

use crate::document::VaultDocument;

/// Owner of the encrypted vault file and the in-memory secret collection.
///
/// Every mutating operation serializes the whole document, encrypts it and
/// rewrites the file in full before returning; there are no incremental
/// writes. After a successful mutation the on-disk state always reflects
/// the in-memory state.
pub struct VaultStore {
    path: PathBuf,
    key: MasterKey,
    document: VaultDocument,
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("path", &self.path)
            .field("key", &"<redacted>")
            .field("document", &self.document)
            .finish()
    }
}

impl VaultStore {
    /// Open (or initialize) the vault at `path` with the given key.
    ///
    /// A missing file is the first-run path: an empty document is created
    /// and persisted immediately. An existing file is read and decrypted.
    ///
    /// # Errors
    /// - [`Error::WrongPasswordOrCorruptFile`] when decryption fails — the
    ///   key is wrong, or the file was tampered with or truncated
    /// - [`Error::CorruptDocument`] when decryption succeeds but the
    ///   payload is not a valid document
    /// - [`Error::PersistFailure`] when the first-run write fails
    pub fn open(path: impl Into<PathBuf>, key: MasterKey) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            info!(path = %path.display(), "vault file not found, initializing empty vault");
            let store = Self {
                path,
                key,
                document: VaultDocument::new(),
            };
            store.persist()?;
            return Ok(store);
        }

        let ciphertext = fs::read(&path)?;
        let plaintext =
            aead::decrypt(&key, &ciphertext).map_err(|_| Error::WrongPasswordOrCorruptFile)?;
        let document = VaultDocument::from_bytes(&plaintext)?;

        debug!(entries = document.len(), "vault opened");
        Ok(Self {
            path,
            key,
            document,
        })
    }

    /// Add (or overwrite) a named secret and persist.
    ///
    /// The seed is accepted only if a code can be computed from it right
    /// now; rejection leaves both memory and disk untouched. On a persist
    /// failure the in-memory insert is NOT rolled back — the caller sees
    /// [`Error::PersistFailure`] and the next successful persist
    /// reconciles disk.
    pub fn add(&mut self, name: &str, seed: &str) -> Result<()> {
        otpvault_totp::current_code(seed)?;

        self.document.insert(name, seed);
        self.persist()?;
        debug!(name, "secret added");
        Ok(())
    }

    /// Remove a named secret. Returns `Ok(false)` without touching the
    /// file when the name is absent.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        if !self.document.remove(name) {
            return Ok(false);
        }
        self.persist()?;
        debug!(name, "secret removed");
        Ok(true)
    }

    /// All stored names, in no particular order contract; the display
    /// layer sorts.
    pub fn list_names(&self) -> Vec<String> {
        self.document.names()
    }

    /// The seed stored under a name.
    pub fn seed(&self, name: &str) -> Option<&str> {
        self.document.seed(name)
    }

    /// The current document serialized for inspection. Read-only; does not
    /// persist.
    pub fn raw_document(&self) -> Result<String> {
        self.document.to_pretty_json()
    }

    pub fn len(&self) -> usize {
        self.document.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Path of the vault file this store owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize, encrypt and rewrite the vault file, then restrict it to
    /// owner read/write. The file is always written whole.
    pub fn persist(&self) -> Result<()> {
        let plaintext = self.document.to_bytes()?;
        let ciphertext = aead::encrypt(&self.key, &plaintext)?;

        fs::write(&self.path, &ciphertext).map_err(|e| Error::PersistFailure(e.to_string()))?;
        restrict_permissions(&self.path).map_err(|e| Error::PersistFailure(e.to_string()))?;

        debug!(path = %self.path.display(), bytes = ciphertext.len(), "vault persisted");
        Ok(())
    }
}

/// Owner-only read/write on the vault file.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use otpvault_crypto::{derive_key, KdfParams, Salt};
    use tempfile::TempDir;

    const VALID_SEED: &str = "JBSWY3DPEHPK3PXP";

    fn test_key(password: &str) -> MasterKey {
        derive_key(
            password.as_bytes(),
            &Salt::embedded(),
            &KdfParams::fast_insecure(),
        )
    }

    fn vault_path(dir: &TempDir) -> PathBuf {
        dir.path().join(".otp_secrets.enc")
    }

    #[test]
    fn first_run_creates_empty_vault_file() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let store = VaultStore::open(&path, test_key("pw")).unwrap();

        assert!(store.list_names().is_empty());
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn vault_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        VaultStore::open(&path, test_key("pw")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn add_then_reopen_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        store.add("work vpn", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
        drop(store);

        let reopened = VaultStore::open(&path, test_key("pw")).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.seed("totp1"), Some(VALID_SEED));
    }

    #[test]
    fn add_rejects_invalid_seed_and_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        let on_disk = fs::read(&path).unwrap();

        let err = store.add("bad", "not-base32!").unwrap_err();
        assert!(matches!(err, Error::InvalidSeedFormat(_)));

        assert_eq!(store.list_names(), vec!["totp1".to_string()]);
        // Rejection happens before the insert, so the file was not rewritten.
        assert_eq!(fs::read(&path).unwrap(), on_disk);
    }

    #[test]
    fn add_overwrites_existing_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = VaultStore::open(vault_path(&dir), test_key("pw")).unwrap();

        store.add("totp1", VALID_SEED).unwrap();
        store.add("totp1", "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.seed("totp1"),
            Some("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ")
        );
    }

    #[test]
    fn remove_present_persists_and_reports_true() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();

        assert!(store.remove("totp1").unwrap());
        drop(store);

        let reopened = VaultStore::open(&path, test_key("pw")).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn remove_absent_reports_false_without_rewrite() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        let on_disk = fs::read(&path).unwrap();

        assert!(!store.remove("absent-name").unwrap());
        assert_eq!(fs::read(&path).unwrap(), on_disk);
    }

    #[test]
    fn wrong_password_fails_distinguishably() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("correct")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        drop(store);

        let err = VaultStore::open(&path, test_key("wrong")).unwrap_err();
        assert!(matches!(err, Error::WrongPasswordOrCorruptFile));
    }

    #[test]
    fn tampered_file_fails_distinguishably() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        drop(store);

        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;
        fs::write(&path, &bytes).unwrap();

        let err = VaultStore::open(&path, test_key("pw")).unwrap_err();
        assert!(matches!(err, Error::WrongPasswordOrCorruptFile));
    }

    #[test]
    fn decrypted_but_unparsable_payload_is_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);
        let key = test_key("pw");

        let ciphertext = otpvault_crypto::encrypt(&key, b"this is not a document").unwrap();
        fs::write(&path, ciphertext).unwrap();

        let err = VaultStore::open(&path, test_key("pw")).unwrap_err();
        assert!(matches!(err, Error::CorruptDocument(_)));
    }

    #[test]
    fn persist_is_idempotent_up_to_nonce() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);
        let key = test_key("pw");

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();

        store.persist().unwrap();
        let first = fs::read(&path).unwrap();
        store.persist().unwrap();
        let second = fs::read(&path).unwrap();

        // Fresh nonce per call, so the bytes differ...
        assert_ne!(first, second);
        // ...but both decrypt to the identical document.
        assert_eq!(
            otpvault_crypto::decrypt(&key, &first).unwrap(),
            otpvault_crypto::decrypt(&key, &second).unwrap()
        );
    }

    #[test]
    fn raw_document_is_pretty_json_and_does_not_persist() {
        let dir = TempDir::new().unwrap();
        let path = vault_path(&dir);

        let mut store = VaultStore::open(&path, test_key("pw")).unwrap();
        store.add("totp1", VALID_SEED).unwrap();
        let on_disk = fs::read(&path).unwrap();

        let raw = store.raw_document().unwrap();
        assert!(raw.contains("\"totp1\""));
        assert!(raw.contains(VALID_SEED));
        assert_eq!(fs::read(&path).unwrap(), on_disk);
    }
}
