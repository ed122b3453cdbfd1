//! Passphrase digests.
//!
//! A passphrase is turned into key material with SHA-256:
//! - the **encryption key** is `SHA-256(passphrase)`;
//! - the **checksum** stored next to each account is
//!   `SHA-256(SHA-256(passphrase))`, which lets the vault validate a
//!   passphrase without decrypting anything.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::encryption::KEY_LEN;

/// Length of the passphrase checksum in bytes.
pub const CHECKSUM_LEN: usize = 32;

/// SHA-256 of `bytes`.
pub fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// An AES-256 key derived from a passphrase, zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct PassphraseKey {
    bytes: [u8; KEY_LEN],
}

impl PassphraseKey {
    /// Derive the encryption key for `passphrase`.
    pub fn derive(passphrase: &str) -> Self {
        Self {
            bytes: digest(passphrase.as_bytes()),
        }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// The checksum that validates this key's passphrase.
    pub fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        digest(&self.bytes)
    }
}

/// Compute the stored checksum for `passphrase`.
pub fn passphrase_checksum(passphrase: &str) -> [u8; CHECKSUM_LEN] {
    PassphraseKey::derive(passphrase).checksum()
}

/// Check `passphrase` against a stored checksum in constant time.
pub fn verify_checksum(passphrase: &str, expected: &[u8]) -> bool {
    passphrase_checksum(passphrase)
        .as_slice()
        .ct_eq(expected)
        .into()
}
