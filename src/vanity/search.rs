//! Parallel vanity search.
//!
//! `worker_count` threads each walk their own entropy chain (random
//! seed, then BLAKE2b-256 of the previous value).  Distinct seeds make
//! overlapping chains negligible but not impossible.  All threads are
//! joined before the call returns.

use std::thread;
use std::time::Instant;

use super::pattern::SearchRequest;
use super::worker::{self, CancelToken, SearchState, Shared, VanityMatch};
use crate::errors::{ColdVaultError, Result};

/// Default worker count: one per logical CPU.
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1)
}

/// Search until an address matching `request` is found.
///
/// `progress(tried, percent)` is called from worker threads at most once
/// per 2000 attempts, with `tried` never decreasing.  Only invariant
/// violations (entropy source or key derivation failure) produce `Err`.
pub fn search<F>(request: &SearchRequest, progress: F, worker_count: usize) -> Result<VanityMatch>
where
    F: Fn(u64, f64) + Sync,
{
    let never = CancelToken::new();
    search_with_cancel(request, progress, worker_count, &never)?.ok_or_else(|| {
        ColdVaultError::CommandFailed("vanity search stopped without a match".into())
    })
}

/// Like [`search`], but returns `Ok(None)` when `cancel` fires first.
///
/// A request no address can satisfy fails with `PatternTooLong` before
/// any worker starts.
pub fn search_with_cancel<F>(
    request: &SearchRequest,
    progress: F,
    worker_count: usize,
    cancel: &CancelToken,
) -> Result<Option<VanityMatch>>
where
    F: Fn(u64, f64) + Sync,
{
    request.check_len()?;

    let worker_count = worker_count.max(1);
    let state = SearchState::new();
    let shared = Shared::new(request, &state, cancel, &progress);
    let started = Instant::now();

    tracing::info!(
        prefix = request.prefix(),
        suffix = request.suffix(),
        workers = worker_count,
        estimate = request.estimated_attempts(),
        "vanity search started"
    );

    thread::scope(|scope| {
        let mut spawned = 0;
        for id in 0..worker_count {
            let shared = &shared;
            let handle = thread::Builder::new()
                .name(format!("vanity-worker-{id}"))
                .spawn_scoped(scope, move || worker::run(id, shared));
            match handle {
                Ok(_) => spawned += 1,
                Err(e) => tracing::warn!(worker = id, "failed to spawn vanity worker: {e}"),
            }
        }
        // Never leave the search without at least one worker.
        if spawned == 0 {
            worker::run(0, &shared);
        }
    });

    let tried = shared.tried.into_inner();
    let outcome = state.into_outcome();

    match &outcome {
        Ok(Some(found)) => tracing::info!(
            address = %found.address,
            worker = found.worker_id,
            tried,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vanity search finished"
        ),
        Ok(None) => tracing::info!(tried, "vanity search cancelled"),
        Err(_) => {}
    }

    outcome
}
