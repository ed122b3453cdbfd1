//! One search thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use rand::TryRngCore;

use super::pattern::SearchRequest;
use crate::errors::{ColdVaultError, Result};
use crate::keys::{mnemonic_from_entropy, KeyDeriver};

type Blake2b256 = Blake2b<U32>;

/// Attempts between checks of the shared stop flag.
pub const BATCH: u64 = 200;

/// Attempts between progress reports.
pub const BIG_BATCH: u64 = 10 * BATCH;

/// A matching address and the mnemonic that derives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VanityMatch {
    pub address: String,
    pub mnemonic: String,
    /// Index of the worker that found it.
    pub worker_id: usize,
}

/// Cooperative cancellation for a running search.
///
/// Workers look at the token at the same batch boundaries where they
/// look for a found result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// The underlying flag, e.g. for a Ctrl-C handler.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.0.clone()
    }
}

/// Shared result slot for one search.
///
/// Write-once: the first worker to record a match wins and later matches
/// are dropped, so two workers finishing in the same window can never
/// interleave their writes.
#[derive(Debug, Default)]
pub struct SearchState {
    stop: AtomicBool,
    found: OnceLock<VanityMatch>,
    failure: OnceLock<ColdVaultError>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match.  Returns `false` if another worker got there first.
    pub fn record(&self, found: VanityMatch) -> bool {
        let won = self.found.set(found).is_ok();
        self.stop.store(true, Ordering::Release);
        won
    }

    /// Record a fatal error; all workers stop.
    pub fn fail(&self, err: ColdVaultError) {
        let _ = self.failure.set(err);
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_done(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn found(&self) -> Option<&VanityMatch> {
        self.found.get()
    }

    /// Consume the slot: a fatal error wins over any match.
    pub fn into_outcome(self) -> Result<Option<VanityMatch>> {
        match self.failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(self.found.into_inner()),
        }
    }
}

/// Everything the workers of one search share.
pub(crate) struct Shared<'a, F> {
    pub request: &'a SearchRequest,
    pub state: &'a SearchState,
    pub cancel: &'a CancelToken,
    pub progress: &'a F,
    pub tried: AtomicU64,
    /// Highest count handed to `progress` so far.
    pub reported: Mutex<u64>,
}

impl<'a, F> Shared<'a, F>
where
    F: Fn(u64, f64) + Sync,
{
    pub fn new(
        request: &'a SearchRequest,
        state: &'a SearchState,
        cancel: &'a CancelToken,
        progress: &'a F,
    ) -> Self {
        Self {
            request,
            state,
            cancel,
            progress,
            tried: AtomicU64::new(0),
            reported: Mutex::new(0),
        }
    }

    fn should_stop(&self) -> bool {
        self.state.is_done() || self.cancel.is_cancelled()
    }

    /// Add a batch to the shared counter and report on big-batch boundaries.
    fn count_batch(&self) {
        let count = self.tried.fetch_add(BATCH, Ordering::Relaxed) + BATCH;
        if count % BIG_BATCH != 0 {
            return;
        }
        // Serialize reports so the callback never sees the count go backwards.
        let mut reported = self
            .reported
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if count > *reported {
            *reported = count;
            let percent = self.request.percent(count);
            tracing::debug!(tried = count, percent, "vanity search progress");
            (self.progress)(count, percent);
        }
    }
}

/// Search from a fresh random seed until a match is found or told to stop.
pub(crate) fn run<F>(id: usize, shared: &Shared<'_, F>)
where
    F: Fn(u64, f64) + Sync,
{
    if let Err(err) = search_chain(id, shared) {
        tracing::error!(worker = id, "vanity worker aborted: {err}");
        shared.state.fail(err);
    }
}

fn search_chain<F>(id: usize, shared: &Shared<'_, F>) -> Result<()>
where
    F: Fn(u64, f64) + Sync,
{
    let deriver = KeyDeriver::new();

    let mut entropy = [0u8; 32];
    rand::rngs::OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| ColdVaultError::KeyDerivationFailed(format!("entropy source: {e}")))?;

    let mut counter: u64 = 0;
    loop {
        if counter % BATCH == 0 {
            if shared.should_stop() {
                return Ok(());
            }
            shared.count_batch();
        }

        let mnemonic = mnemonic_from_entropy(&entropy)?;
        let keypair = deriver.derive_from_mnemonic(&mnemonic)?;

        if shared.request.matches(keypair.address()) {
            shared.state.record(VanityMatch {
                address: keypair.address().to_string(),
                mnemonic: mnemonic.to_string(),
                worker_id: id,
            });
            return Ok(());
        }

        entropy = Blake2b256::digest(entropy).into();
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(address: &str, worker_id: usize) -> VanityMatch {
        VanityMatch {
            address: address.into(),
            mnemonic: "m".into(),
            worker_id,
        }
    }

    #[test]
    fn first_record_wins() {
        let state = SearchState::new();
        assert!(!state.is_done());
        assert!(state.record(hit("coinex1a", 0)));
        assert!(!state.record(hit("coinex1b", 1)));
        assert!(state.is_done());
        let found = state.into_outcome().unwrap().unwrap();
        assert_eq!(found.address, "coinex1a");
    }

    #[test]
    fn failure_overrides_match() {
        let state = SearchState::new();
        state.record(hit("coinex1a", 0));
        state.fail(ColdVaultError::KeyDerivationFailed("boom".into()));
        assert!(state.into_outcome().unwrap_err().is_fatal());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn entropy_chain_is_deterministic() {
        let a: [u8; 32] = Blake2b256::digest([1u8; 32]).into();
        let b: [u8; 32] = Blake2b256::digest([1u8; 32]).into();
        assert_eq!(a, b);
        assert_ne!(a, [1u8; 32]);
    }
}
