//! Short-lived in-memory passphrase cache.
//!
//! Entries expire lazily: each one carries its own deadline and is
//! treated as absent once that deadline passes.  There are no background
//! timers, so an expired entry can never remove a newer one for the same
//! address.  Passphrases are wiped from memory when evicted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use zeroize::Zeroizing;

/// How long a cached passphrase stays usable.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

struct CachedPassphrase {
    value: Zeroizing<String>,
    deadline: Instant,
}

impl CachedPassphrase {
    fn is_live(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

/// Map from address to a recently validated passphrase.
///
/// Does not validate anything itself; the vault checks the passphrase
/// before calling [`PassphraseCache::put`].
pub struct PassphraseCache {
    ttl: Duration,
    entries: HashMap<String, CachedPassphrase>,
}

impl PassphraseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached passphrase for `address`, if one is still live.
    pub fn get(&self, address: &str) -> Option<Zeroizing<String>> {
        self.get_at(address, Instant::now())
    }

    /// Cache `passphrase` for `address`.
    ///
    /// Re-caching the same live passphrase keeps its first deadline;
    /// a different passphrase replaces the entry with a fresh one.
    pub fn put(&mut self, address: &str, passphrase: &str) {
        self.put_at(address, passphrase, Instant::now());
    }

    pub fn remove(&mut self, address: &str) {
        self.entries.remove(address);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_at(&self, address: &str, now: Instant) -> Option<Zeroizing<String>> {
        self.entries
            .get(address)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    pub(crate) fn put_at(&mut self, address: &str, passphrase: &str, now: Instant) {
        self.entries.retain(|_, entry| entry.is_live(now));

        if let Some(entry) = self.entries.get(address) {
            if entry.value.as_str() == passphrase {
                return;
            }
        }

        self.entries.insert(
            address.to_string(),
            CachedPassphrase {
                value: Zeroizing::new(passphrase.to_string()),
                deadline: now + self.ttl,
            },
        );
    }
}

impl Default for PassphraseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn live_entry_is_returned() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "pw", t0);
        assert_eq!(cache.get_at("coinex1a", t0).unwrap().as_str(), "pw");
        assert!(cache.get_at("coinex1b", t0).is_none());
    }

    #[test]
    fn entry_expires_at_deadline() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "pw", t0);
        assert!(cache.get_at("coinex1a", t0 + TTL - Duration::from_millis(1)).is_some());
        assert!(cache.get_at("coinex1a", t0 + TTL).is_none());
    }

    #[test]
    fn same_passphrase_keeps_deadline() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "pw", t0);
        cache.put_at("coinex1a", "pw", t0 + Duration::from_secs(5));
        assert!(cache.get_at("coinex1a", t0 + TTL).is_none());
    }

    #[test]
    fn new_passphrase_gets_fresh_deadline() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "old", t0);
        let t1 = t0 + Duration::from_secs(5);
        cache.put_at("coinex1a", "new", t1);

        // The first entry's deadline no longer applies.
        let got = cache.get_at("coinex1a", t0 + TTL).unwrap();
        assert_eq!(got.as_str(), "new");
        assert!(cache.get_at("coinex1a", t1 + TTL).is_none());
    }

    #[test]
    fn expired_entry_is_replaced() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "pw", t0);
        let later = t0 + TTL + Duration::from_secs(1);
        cache.put_at("coinex1a", "pw", later);
        assert!(cache.get_at("coinex1a", later + Duration::from_secs(1)).is_some());
    }

    #[test]
    fn put_evicts_expired_entries() {
        let mut cache = PassphraseCache::new(TTL);
        let t0 = Instant::now();
        cache.put_at("coinex1a", "pw", t0);
        cache.put_at("coinex1b", "pw", t0 + TTL * 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut cache = PassphraseCache::default();
        cache.put("coinex1a", "pw");
        cache.put("coinex1b", "pw");
        cache.remove("coinex1a");
        assert!(cache.get("coinex1a").is_none());
        assert!(cache.get("coinex1b").is_some());
        cache.clear();
        assert!(cache.is_empty());
    }
}
