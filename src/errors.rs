use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in ColdVault.
///
/// Variants fall into three groups: user input errors, environment/IO
/// errors, and invariant violations.  Only the last group is fatal; see
/// [`ColdVaultError::is_fatal`].
#[derive(Debug, Error)]
pub enum ColdVaultError {
    // --- User input errors ---
    #[error("Invalid character {0} — only 023456789acdefghjklmnpqrstuvwxyz are allowed")]
    InvalidAddressChar(String),

    #[error("Pattern too long: {len} characters constrained, an address has only {max}")]
    PatternTooLong { len: usize, max: usize },

    #[error("Passphrase mismatch — passphrases do not match")]
    PassphraseMismatch,

    #[error("Memo cannot be empty")]
    EmptyMemo,

    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    #[error("No such account: {0}")]
    NoSuchAccount(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid transaction message: {0}")]
    InvalidMessage(String),

    #[error("User cancelled operation")]
    UserCancelled,

    // --- Environment / IO errors ---
    #[error("{0} is not a plain file")]
    NotAPlainFile(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Vault is closed")]
    VaultClosed,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Config file error: {0}")]
    ConfigError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Invariant violations (fatal) ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — the vault entry is corrupted or the passphrase was never checked")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),
}

impl ColdVaultError {
    /// Returns `true` for invariant violations.
    ///
    /// These indicate a corrupted store, a tampered file, or a programming
    /// defect.  Callers abort the operation instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EncryptionFailed(_) | Self::DecryptionFailed | Self::KeyDerivationFailed(_)
        )
    }
}

/// Convenience type alias for ColdVault results.
pub type Result<T> = std::result::Result<T, ColdVaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(ColdVaultError::DecryptionFailed.is_fatal());
        assert!(ColdVaultError::EncryptionFailed("x".into()).is_fatal());
        assert!(ColdVaultError::KeyDerivationFailed("x".into()).is_fatal());

        assert!(!ColdVaultError::IncorrectPassphrase.is_fatal());
        assert!(!ColdVaultError::NoSuchAccount("coinex1abc".into()).is_fatal());
        assert!(!ColdVaultError::EmptyMemo.is_fatal());
        assert!(!ColdVaultError::PatternTooLong { len: 39, max: 38 }.is_fatal());
    }

    #[test]
    fn invalid_char_message_quotes_the_character() {
        let e = ColdVaultError::InvalidAddressChar("'b'".into());
        assert!(e.to_string().starts_with("Invalid character 'b'"));
    }
}
