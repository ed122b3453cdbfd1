//! `coldvault create`: find a vanity address and store its mnemonic.
//!
//! Validates the pattern, asks for a passphrase, runs the parallel search
//! with progress on stderr (Ctrl-C stops it), then encrypts and stores
//! the mnemonic under the passphrase.

use std::sync::atomic::Ordering;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_new_passphrase, Cli, PASSPHRASE_ENV};
use crate::errors::{ColdVaultError, Result};
use crate::vanity::{self, CancelToken, SearchRequest};

/// Execute the `create` command.
pub fn execute(
    cli: &Cli,
    prefix: &str,
    suffix: &str,
    memo: &str,
    workers: Option<usize>,
) -> Result<()> {
    // Reject bad input before anything slow happens.
    if memo.is_empty() {
        return Err(ColdVaultError::EmptyMemo);
    }
    let request = SearchRequest::parse(prefix, suffix)?;

    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    if request.constrained_len() > settings.long_search_warning {
        output::warning(&format!(
            "{} constrained characters need about {:.0} attempts; this can take a very long time.",
            request.constrained_len(),
            request.estimated_attempts()
        ));
    }

    let passphrase = prompt_new_passphrase(PASSPHRASE_ENV)?;

    let cancel = CancelToken::new();
    let flag = cancel.flag();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }

    let workers = workers
        .filter(|&n| n > 0)
        .unwrap_or_else(|| settings.worker_count());

    output::info(&format!(
        "Searching for {}...{} on {workers} thread(s). Press Ctrl-C to stop.",
        request.prefix(),
        request.suffix()
    ));

    let outcome = vanity::search_with_cancel(&request, output::progress, workers, &cancel);
    output::progress_done();

    let found = outcome?.ok_or(ColdVaultError::UserCancelled)?;
    let mnemonic = Zeroizing::new(found.mnemonic);

    let account = vault.create_account(memo, &mnemonic, &passphrase)?;

    output::success(&format!("Stored account {} ({memo})", account.address));
    output::info("Mnemonic:");
    println!("{}", mnemonic.as_str());
    output::tip("Write the mnemonic down and keep it offline. It is the only backup of this key.");

    Ok(())
}
