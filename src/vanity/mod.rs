//! Vanity address search.
//!
//! This module provides:
//! - Address alphabet validation and prefix/suffix matching (`pattern`)
//! - The per-thread search loop and shared result slot (`worker`)
//! - The multi-threaded entry points (`search`)

mod pattern;
mod search;
mod worker;

pub use pattern::{check_valid, SearchRequest, ADDRESS_ALPHABET, ADDRESS_DATA_LEN};
pub use search::{default_worker_count, search, search_with_cancel};
pub use worker::{CancelToken, SearchState, VanityMatch, BATCH, BIG_BATCH};
