//! A single vault entry.
//!
//! Each account holds a label, its address, a checksum that validates
//! the passphrase, and the mnemonic encrypted under that passphrase.
//! Byte fields serialize as base64 strings in JSON (see `format`).

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use super::format::{bytes_decode, bytes_encode};
use crate::crypto::{decrypt, encrypt, verify_checksum, PassphraseKey, NONCE_LEN};
use crate::errors::{ColdVaultError, Result};
use crate::keys::derive_keypair;

/// One account stored in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// User-supplied label.
    pub memo: String,

    /// Bech32 address derived from the mnemonic.  Unique within a vault.
    pub address: String,

    /// `SHA-256(SHA-256(passphrase))`.
    #[serde(serialize_with = "bytes_encode", deserialize_with = "bytes_decode")]
    pub passphrase_cksum: Vec<u8>,

    /// 12-byte nonce followed by the AES-GCM ciphertext of the mnemonic.
    #[serde(serialize_with = "bytes_encode", deserialize_with = "bytes_decode")]
    pub encrypted_mnemonic: Vec<u8>,
}

impl AccountInfo {
    /// Build an entry for `mnemonic`, deriving its address.
    pub fn new(memo: &str, mnemonic: &str, passphrase: &str) -> Result<Self> {
        let keypair = derive_keypair(mnemonic)?;
        Self::seal(memo, keypair.address(), mnemonic, passphrase)
    }

    /// Build an entry for a mnemonic whose address is already known.
    pub fn seal(memo: &str, address: &str, mnemonic: &str, passphrase: &str) -> Result<Self> {
        let key = PassphraseKey::derive(passphrase);
        let (ciphertext, nonce) = encrypt(key.as_bytes(), mnemonic.as_bytes())?;

        let mut encrypted_mnemonic = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        encrypted_mnemonic.extend_from_slice(&nonce);
        encrypted_mnemonic.extend_from_slice(&ciphertext);

        Ok(Self {
            memo: memo.to_string(),
            address: address.to_string(),
            passphrase_cksum: key.checksum().to_vec(),
            encrypted_mnemonic,
        })
    }

    /// Validate `passphrase` against the stored checksum.
    pub fn check_passphrase(&self, passphrase: &str) -> Result<()> {
        if verify_checksum(passphrase, &self.passphrase_cksum) {
            Ok(())
        } else {
            Err(ColdVaultError::IncorrectPassphrase)
        }
    }

    /// Decrypt the mnemonic.
    ///
    /// Does not look at the checksum; a wrong passphrase surfaces as the
    /// fatal `DecryptionFailed`.  Call `check_passphrase` first.
    pub fn decrypt_mnemonic(&self, passphrase: &str) -> Result<Zeroizing<String>> {
        if self.encrypted_mnemonic.len() < NONCE_LEN {
            return Err(ColdVaultError::DecryptionFailed);
        }
        let (nonce, ciphertext) = self.encrypted_mnemonic.split_at(NONCE_LEN);

        let key = PassphraseKey::derive(passphrase);
        let plaintext = decrypt(key.as_bytes(), ciphertext, nonce)?;

        // On error, wipe the bytes inside the error before discarding.
        String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            ColdVaultError::DecryptionFailed
        })
    }

    /// `"address: memo"`, the one-line form used in listings.
    pub fn list_item(&self) -> String {
        format!("{}: {}", self.address, self.memo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn new_derives_address_and_encrypts() {
        let acc = AccountInfo::new("savings", PHRASE, "pw").unwrap();
        assert!(acc.address.starts_with("coinex1"));
        assert_eq!(acc.passphrase_cksum.len(), 32);
        assert!(acc.encrypted_mnemonic.len() > NONCE_LEN + PHRASE.len());
        assert!(!acc
            .encrypted_mnemonic
            .windows(7)
            .any(|w| w == b"abandon"));
    }

    #[test]
    fn decrypt_roundtrip() {
        let acc = AccountInfo::new("m", PHRASE, "pw").unwrap();
        acc.check_passphrase("pw").unwrap();
        assert_eq!(acc.decrypt_mnemonic("pw").unwrap().as_str(), PHRASE);
    }

    #[test]
    fn wrong_passphrase() {
        let acc = AccountInfo::new("m", PHRASE, "pw").unwrap();
        assert!(matches!(
            acc.check_passphrase("nope"),
            Err(ColdVaultError::IncorrectPassphrase)
        ));
        assert!(acc.decrypt_mnemonic("nope").unwrap_err().is_fatal());
    }

    #[test]
    fn truncated_ciphertext_is_fatal() {
        let mut acc = AccountInfo::new("m", PHRASE, "pw").unwrap();
        acc.encrypted_mnemonic.truncate(4);
        assert!(acc.decrypt_mnemonic("pw").unwrap_err().is_fatal());
    }

    #[test]
    fn json_field_names() {
        let acc = AccountInfo::new("m", PHRASE, "pw").unwrap();
        let json: serde_json::Value = serde_json::to_value(&acc).unwrap();
        for field in ["memo", "address", "passphrase_cksum", "encrypted_mnemonic"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert!(json["passphrase_cksum"].is_string());
    }

    #[test]
    fn list_item_format() {
        let acc = AccountInfo::new("cold", PHRASE, "pw").unwrap();
        assert_eq!(acc.list_item(), format!("{}: cold", acc.address));
    }
}
