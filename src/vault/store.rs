//! High-level vault operations used by CLI commands.
//!
//! `Vault` owns the account list, an open read/write handle to the backing
//! file, and the passphrase cache.  A single `RwLock` guards all three:
//! lookups and listing share the lock, every mutation (cache puts
//! included) takes it exclusively and persists before releasing it.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use zeroize::Zeroizing;

use crate::errors::{ColdVaultError, Result};
use crate::keys::{self, StdSignature, SIGNATURE_LEN};

use super::account::AccountInfo;
use super::cache::{PassphraseCache, DEFAULT_CACHE_TTL};
use super::format;

/// The main vault handle.  Open one with `Vault::open`, pass it to
/// whatever needs it, and `close` it (or drop it) when done.
pub struct Vault {
    /// Path to the vault file on disk.
    path: PathBuf,

    inner: RwLock<Inner>,
}

struct Inner {
    /// `None` once the vault is closed.
    file: Option<File>,

    /// Insertion-ordered; addresses are unique.
    accounts: Vec<AccountInfo>,

    cache: PassphraseCache,
}

impl Inner {
    fn ensure_open(&self) -> Result<()> {
        if self.file.is_some() {
            Ok(())
        } else {
            Err(ColdVaultError::VaultClosed)
        }
    }

    fn position(&self, address: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.address == address)
    }

    fn find(&self, address: &str) -> Result<&AccountInfo> {
        self.ensure_open()?;
        self.accounts
            .iter()
            .find(|a| a.address == address)
            .ok_or_else(|| ColdVaultError::NoSuchAccount(address.to_string()))
    }

    /// The account list with `account` replacing the entry of the same
    /// address in place, or appended.
    fn upserted(&self, account: AccountInfo) -> Vec<AccountInfo> {
        let mut accounts = self.accounts.clone();
        match self.position(&account.address) {
            Some(i) => accounts[i] = account,
            None => accounts.push(account),
        }
        accounts
    }

    /// Persist `accounts`, and adopt them only once the write succeeded.
    fn commit(&mut self, accounts: Vec<AccountInfo>) -> Result<()> {
        let file = self.file.as_mut().ok_or(ColdVaultError::VaultClosed)?;
        format::write_accounts(file, &accounts)?;
        self.accounts = accounts;
        tracing::debug!(accounts = self.accounts.len(), "vault saved");
        Ok(())
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the vault at `path`, creating an empty one if it is missing.
    ///
    /// Fails with `NotAPlainFile` if `path` exists but is a directory or
    /// other non-regular file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_cache_ttl(path, DEFAULT_CACHE_TTL)
    }

    /// Like [`Vault::open`], with a custom passphrase cache timeout.
    pub fn open_with_cache_ttl(path: &Path, cache_ttl: Duration) -> Result<Self> {
        let exists = match fs::metadata(path) {
            Ok(meta) if !meta.is_file() => {
                return Err(ColdVaultError::NotAPlainFile(path.to_path_buf()))
            }
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(false);
        // Owner-only permissions on Unix, applied when the file is created.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;

        let accounts = if exists {
            dedupe(format::read_accounts(&mut file)?)
        } else {
            Vec::new()
        };

        tracing::info!(
            path = %path.display(),
            accounts = accounts.len(),
            created = !exists,
            "vault opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            inner: RwLock::new(Inner {
                file: Some(file),
                accounts,
                cache: PassphraseCache::new(cache_ttl),
            }),
        })
    }

    /// Release the file handle and forget every account and cached
    /// passphrase.  Later operations fail with `VaultClosed`.
    pub fn close(&self) {
        let mut inner = self.write();
        if inner.file.take().is_some() {
            inner.accounts.clear();
            inner.cache.clear();
            tracing::info!(path = %self.path.display(), "vault closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.read().file.is_some()
    }

    // ------------------------------------------------------------------
    // Account mutations
    // ------------------------------------------------------------------

    /// Encrypt `mnemonic` under `passphrase` and store it.
    ///
    /// An existing account with the same address is replaced in place.
    pub fn create_account(&self, memo: &str, mnemonic: &str, passphrase: &str) -> Result<AccountInfo> {
        if memo.is_empty() {
            return Err(ColdVaultError::EmptyMemo);
        }
        self.read().ensure_open()?;

        // Key derivation is the slow part; do it before taking the lock.
        let account = AccountInfo::new(memo, mnemonic, passphrase)?;

        let mut inner = self.write();
        inner.ensure_open()?;
        let replaced = inner.position(&account.address).is_some();
        let accounts = inner.upserted(account.clone());
        inner.commit(accounts)?;
        inner.cache.remove(&account.address);

        tracing::info!(address = %account.address, replaced, "account stored");
        Ok(account)
    }

    /// Re-encrypt an account's mnemonic under `new_passphrase`.
    ///
    /// The memo and position in the list are kept.  Any cached passphrase
    /// for the account is dropped.
    pub fn change_passphrase(&self, address: &str, old_passphrase: &str, new_passphrase: &str) -> Result<()> {
        let mut inner = self.write();
        let current = inner.find(address)?;
        current.check_passphrase(old_passphrase)?;

        let mnemonic = current.decrypt_mnemonic(old_passphrase)?;
        let updated = AccountInfo::seal(&current.memo, address, &mnemonic, new_passphrase)?;

        let accounts = inner.upserted(updated);
        inner.commit(accounts)?;
        inner.cache.remove(address);

        tracing::info!(address, "passphrase changed");
        Ok(())
    }

    /// Remove an account after checking its passphrase.
    pub fn delete_account(&self, address: &str, passphrase: &str) -> Result<()> {
        let mut inner = self.write();
        inner.find(address)?.check_passphrase(passphrase)?;

        let mut accounts = inner.accounts.clone();
        if let Some(i) = inner.position(address) {
            accounts.swap_remove(i);
        }
        inner.commit(accounts)?;
        inner.cache.remove(address);

        tracing::info!(address, "account deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Secrets
    // ------------------------------------------------------------------

    /// Decrypt an account's mnemonic.
    ///
    /// The passphrase is not checked against the checksum here; a wrong
    /// one fails with the fatal `DecryptionFailed`.  Validate first with
    /// [`Vault::check_passphrase`].
    pub fn get_mnemonic(&self, address: &str, passphrase: &str) -> Result<Zeroizing<String>> {
        let inner = self.read();
        let account = inner.find(address)?;
        account.decrypt_mnemonic(passphrase)
    }

    /// `Ok(())` if `passphrase` matches the account's checksum.
    pub fn check_passphrase(&self, address: &str, passphrase: &str) -> Result<()> {
        self.read().find(address)?.check_passphrase(passphrase)
    }

    /// Sign `payload` with the account's key.
    ///
    /// Returns the 64-byte compact signature and 33-byte compressed
    /// public key.  A wrong passphrase fails with `IncorrectPassphrase`.
    pub fn sign(&self, address: &str, passphrase: &str, payload: &[u8]) -> Result<([u8; SIGNATURE_LEN], [u8; 33])> {
        let mnemonic = {
            let inner = self.read();
            let account = inner.find(address)?;
            account.check_passphrase(passphrase)?;
            account.decrypt_mnemonic(passphrase)?
        };

        let signed = keys::sign(&mnemonic, payload)?;
        tracing::debug!(address, bytes = payload.len(), "payload signed");
        Ok(signed)
    }

    /// [`Vault::sign`], wrapped in the JSON signature envelope.
    pub fn sign_json(&self, address: &str, passphrase: &str, payload: &[u8]) -> Result<StdSignature> {
        let (signature, public_key) = self.sign(address, passphrase, payload)?;
        Ok(StdSignature::new(&signature, &public_key))
    }

    // ------------------------------------------------------------------
    // Passphrase cache
    // ------------------------------------------------------------------

    /// A recently validated passphrase for `address`, if still live.
    pub fn cached_passphrase(&self, address: &str) -> Option<Zeroizing<String>> {
        let hit = self.read().cache.get(address);
        tracing::debug!(address, hit = hit.is_some(), "passphrase cache lookup");
        hit
    }

    /// Validate `passphrase` and remember it for the cache timeout.
    pub fn cache_passphrase(&self, address: &str, passphrase: &str) -> Result<()> {
        let mut inner = self.write();
        inner.find(address)?.check_passphrase(passphrase)?;
        inner.cache.put(address, passphrase);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn has_account(&self, address: &str) -> bool {
        self.read().position(address).is_some()
    }

    pub fn account(&self, address: &str) -> Option<AccountInfo> {
        self.read().find(address).ok().cloned()
    }

    /// Snapshot of every account in list order.
    pub fn accounts(&self) -> Vec<AccountInfo> {
        self.read().accounts.clone()
    }

    /// One `"address: memo"` line per account.
    pub fn list_items(&self) -> Vec<String> {
        self.read().accounts.iter().map(AccountInfo::list_item).collect()
    }

    pub fn len(&self) -> usize {
        self.read().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cache_ttl(&self) -> Duration {
        self.read().cache.ttl()
    }

    // ------------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------------

    // A panic while holding the lock cannot leave `Inner` half-updated in
    // a way later readers would misinterpret, so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keep the last entry for each address, at the position of the first.
fn dedupe(accounts: Vec<AccountInfo>) -> Vec<AccountInfo> {
    let mut out: Vec<AccountInfo> = Vec::with_capacity(accounts.len());
    for account in accounts {
        match out.iter().position(|a| a.address == account.address) {
            Some(i) => out[i] = account,
            None => out.push(account),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const PHRASE_B: &str = "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong";

    fn vault_path() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");
        (dir, path)
    }

    #[test]
    fn open_creates_empty_file() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        assert!(vault.is_open());
        assert!(vault.is_empty());
        assert!(path.is_file());
    }

    #[test]
    fn directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = Vault::open(dir.path()).err().unwrap();
        assert!(matches!(err, ColdVaultError::NotAPlainFile(_)));
    }

    #[test]
    fn empty_memo_is_rejected() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        assert!(matches!(
            vault.create_account("", PHRASE, "pw"),
            Err(ColdVaultError::EmptyMemo)
        ));
    }

    #[test]
    fn readding_replaces_in_place() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        vault.create_account("first", PHRASE, "pw").unwrap();
        vault.create_account("second", PHRASE, "pw2").unwrap();

        assert_eq!(vault.len(), 1);
        let acc = &vault.accounts()[0];
        assert_eq!(acc.memo, "second");
        vault.check_passphrase(&acc.address, "pw2").unwrap();
    }

    #[test]
    fn closed_vault_rejects_operations() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        let acc = vault.create_account("m", PHRASE, "pw").unwrap();
        vault.close();

        assert!(!vault.is_open());
        assert!(matches!(
            vault.get_mnemonic(&acc.address, "pw"),
            Err(ColdVaultError::VaultClosed)
        ));
        assert!(matches!(
            vault.create_account("m", PHRASE, "pw"),
            Err(ColdVaultError::VaultClosed)
        ));
    }

    #[test]
    fn dedupe_keeps_last_at_first_position() {
        let a = AccountInfo::new("a", PHRASE, "pw").unwrap();
        let mut b = a.clone();
        b.memo = "b".into();
        let mut other = a.clone();
        other.address = "coinex1other".into();

        let out = dedupe(vec![a, other.clone(), b]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].memo, "b");
        assert_eq!(out[1], other);
    }

    #[test]
    fn cache_is_cleared_on_passphrase_change() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        let acc = vault.create_account("m", PHRASE, "old").unwrap();

        vault.cache_passphrase(&acc.address, "old").unwrap();
        vault.change_passphrase(&acc.address, "old", "new").unwrap();
        assert!(vault.cached_passphrase(&acc.address).is_none());
    }

    // Swap in a read-only handle so the next rewrite fails.
    fn break_writes(vault: &Vault) {
        let read_only = File::open(vault.path()).unwrap();
        vault.write().file = Some(read_only);
    }

    #[test]
    fn failed_create_leaves_accounts_unchanged() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        vault.create_account("a", PHRASE, "pw").unwrap();
        let before = vault.accounts();

        break_writes(&vault);
        assert!(vault.create_account("b", PHRASE_B, "pw").is_err());

        assert_eq!(vault.len(), 1);
        assert_eq!(vault.accounts(), before);
    }

    #[test]
    fn failed_delete_keeps_account_and_cache() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        let acc = vault.create_account("a", PHRASE, "pw").unwrap();
        vault.cache_passphrase(&acc.address, "pw").unwrap();

        break_writes(&vault);
        assert!(vault.delete_account(&acc.address, "pw").is_err());

        assert!(vault.has_account(&acc.address));
        assert!(vault.cached_passphrase(&acc.address).is_some());
        let reopened = Vault::open(&path).unwrap();
        assert!(reopened.has_account(&acc.address));
    }

    #[test]
    fn failed_passphrase_change_keeps_old_passphrase() {
        let (_dir, path) = vault_path();
        let vault = Vault::open(&path).unwrap();
        let acc = vault.create_account("a", PHRASE, "old").unwrap();

        break_writes(&vault);
        assert!(vault.change_passphrase(&acc.address, "old", "new").is_err());

        vault.check_passphrase(&acc.address, "old").unwrap();
        assert!(matches!(
            vault.check_passphrase(&acc.address, "new"),
            Err(ColdVaultError::IncorrectPassphrase)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, path) = vault_path();
        Vault::open(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
