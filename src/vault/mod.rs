//! Vault module: encrypted account storage.
//!
//! This module provides:
//! - `AccountInfo`, one encrypted account entry (`account`)
//! - The JSON vault file format (`format`)
//! - The expiring passphrase cache (`cache`)
//! - The `Vault` handle for opening and managing a vault file (`store`)

pub mod account;
pub mod cache;
pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use account::AccountInfo;
pub use cache::{PassphraseCache, DEFAULT_CACHE_TTL};
pub use store::Vault;
