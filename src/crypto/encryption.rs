//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce from the
//! OS CSPRNG and returns it next to the ciphertext.  Vault entries store
//! the two concatenated:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! Both directions treat failure as an invariant violation: a bad key
//! length is a programming error, and an authentication failure means the
//! caller skipped the passphrase checksum or the entry was tampered with.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{ColdVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns `(ciphertext, nonce)`.  The nonce is never reused.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN])> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| ColdVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| ColdVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    Ok((ciphertext, nonce_bytes))
}

/// Decrypt `ciphertext` that was produced by `encrypt` with `nonce`.
pub fn decrypt(key: &[u8], ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN {
        return Err(ColdVaultError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| ColdVaultError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| ColdVaultError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_key_length_is_fatal() {
        let err = encrypt(&[0u8; 16], b"data").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn short_nonce_is_rejected() {
        let key = [7u8; KEY_LEN];
        let (ct, _) = encrypt(&key, b"data").unwrap();
        assert!(matches!(
            decrypt(&key, &ct, &[0u8; 8]),
            Err(ColdVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn ciphertext_carries_auth_tag() {
        let key = [7u8; KEY_LEN];
        let (ct, _) = encrypt(&key, b"abandon").unwrap();
        assert_eq!(ct.len(), b"abandon".len() + 16);
    }
}
