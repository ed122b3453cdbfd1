//! Address alphabet validation and prefix/suffix matching.

use crate::errors::{ColdVaultError, Result};
use crate::keys::ADDRESS_PREFIX;

/// Every character a bech32 address body can contain.
pub const ADDRESS_ALPHABET: &str = "023456789acdefghjklmnpqrstuvwxyz";

/// Characters after `coinex1`: 32 of payload plus a 6-character checksum.
pub const ADDRESS_DATA_LEN: usize = 38;

/// Number of symbols in [`ADDRESS_ALPHABET`].
const ALPHABET_SIZE: f64 = 32.0;

/// Reject the first character of `s` that cannot appear in an address.
///
/// The offending character is reported quoted, e.g. `'b'`.
pub fn check_valid(s: &str) -> Result<()> {
    match s.chars().find(|c| !ADDRESS_ALPHABET.contains(*c)) {
        Some(c) => Err(ColdVaultError::InvalidAddressChar(format!("{c:?}"))),
        None => Ok(()),
    }
}

/// What a vanity search is looking for.
///
/// The stored prefix always starts with the literal `coinex1`, so a
/// user prefix of `"xyz"` matches addresses beginning `coinex1xyz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    prefix: String,
    suffix: String,
}

impl SearchRequest {
    /// Build a request from the user-chosen part of the prefix and a suffix.
    ///
    /// Character legality is not checked here; callers run
    /// [`check_valid`] first.
    pub fn new(user_prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: format!("{ADDRESS_PREFIX}{user_prefix}"),
            suffix: suffix.to_string(),
        }
    }

    /// Validate both parts and build the request.
    ///
    /// Fails on a character outside [`ADDRESS_ALPHABET`], or when prefix
    /// and suffix together constrain more characters than an address has.
    pub fn parse(user_prefix: &str, suffix: &str) -> Result<Self> {
        check_valid(user_prefix)?;
        check_valid(suffix)?;
        let request = Self::new(user_prefix, suffix);
        request.check_len()?;
        Ok(request)
    }

    /// `PatternTooLong` if no address could ever match.
    pub fn check_len(&self) -> Result<()> {
        let len = self.constrained_len();
        if len > ADDRESS_DATA_LEN {
            return Err(ColdVaultError::PatternTooLong {
                len,
                max: ADDRESS_DATA_LEN,
            });
        }
        Ok(())
    }

    /// Full prefix including the literal `coinex1`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        address.starts_with(&self.prefix) && address.ends_with(&self.suffix)
    }

    /// Number of address characters constrained beyond `coinex1`.
    pub fn constrained_len(&self) -> usize {
        (self.prefix.len() + self.suffix.len()).saturating_sub(ADDRESS_PREFIX.len())
    }

    /// Rough size of the search space, `32^k`.
    ///
    /// Assumes derived addresses are uniformly random.
    pub fn estimated_attempts(&self) -> f64 {
        let k = i32::try_from(self.constrained_len()).unwrap_or(i32::MAX);
        ALPHABET_SIZE.powi(k)
    }

    /// Percent of the estimated space covered after `tried` attempts.
    pub fn percent(&self, tried: u64) -> f64 {
        100.0 * tried as f64 / self.estimated_attempts()
    }
}
