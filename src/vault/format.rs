//! On-disk vault file format.
//!
//! A vault file is a single JSON array of accounts:
//!
//! ```text
//! [{"memo":"...","address":"coinex1...","passphrase_cksum":"<base64>","encrypted_mnemonic":"<base64>"}, ...]
//! ```
//!
//! Every change rewrites the whole array in place through the handle the
//! vault holds open: truncate, write, fsync.  A zero-length file reads as
//! an empty vault.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use serde::Deserialize;

use super::account::AccountInfo;
use crate::errors::{ColdVaultError, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read and parse every account from the start of `file`.
pub fn read_accounts(file: &mut File) -> Result<Vec<AccountInfo>> {
    file.seek(SeekFrom::Start(0))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    parse_accounts(&data)
}

/// Parse a vault file's contents.
pub fn parse_accounts(data: &[u8]) -> Result<Vec<AccountInfo>> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(data)
        .map_err(|e| ColdVaultError::InvalidVaultFormat(format!("accounts JSON: {e}")))
}

/// Replace the contents of `file` with `accounts` and flush to disk.
pub fn write_accounts(file: &mut File, accounts: &[AccountInfo]) -> Result<()> {
    let bytes = serde_json::to_vec(accounts)
        .map_err(|e| ColdVaultError::SerializationError(format!("accounts: {e}")))?;

    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn bytes_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

/// Accepts a base64 string or a plain array of byte values.
pub(crate) fn bytes_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bytes {
        Base64(String),
        Array(Vec<u8>),
    }

    match Bytes::deserialize(deserializer)? {
        Bytes::Base64(s) => BASE64.decode(&s).map_err(serde::de::Error::custom),
        Bytes::Array(v) => Ok(v),
    }
}
