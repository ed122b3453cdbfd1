//! Cryptographic primitives for ColdVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - SHA-256 passphrase keys and checksums (`passphrase`)

pub mod encryption;
pub mod passphrase;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, PassphraseKey, ...};
pub use encryption::{decrypt, encrypt, KEY_LEN, NONCE_LEN};
pub use passphrase::{digest, passphrase_checksum, verify_checksum, PassphraseKey, CHECKSUM_LEN};
