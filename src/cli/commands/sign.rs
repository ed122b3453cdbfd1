//! `coldvault sign`: sign JSON transaction descriptions.
//!
//! Each file is decoded, its signer looked up in the vault, and the
//! signature envelope printed to stdout as one JSON line.  A passphrase
//! entered once is cached, so several files from the same signer need
//! only one prompt.

use std::fs;
use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_passphrase, Cli};
use crate::errors::{ColdVaultError, Result};
use crate::msg::TxMessage;

/// Execute the `sign` command.
pub fn execute(cli: &Cli, files: &[PathBuf]) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    for file in files {
        let json = fs::read_to_string(file).map_err(|e| {
            ColdVaultError::CommandFailed(format!("cannot read {}: {e}", file.display()))
        })?;

        let msg = TxMessage::parse(&json)?;
        let signer = msg.signer();
        if !vault.has_account(signer) {
            return Err(ColdVaultError::NoSuchAccount(signer.to_string()));
        }

        output::info(&format!("{}: {}", file.display(), msg.kind));
        let sign_bytes = msg.sign_bytes()?;

        let passphrase = match vault.cached_passphrase(signer) {
            Some(cached) => cached,
            None => {
                let entered = prompt_passphrase(&format!("Passphrase for {signer}"))?;
                vault.cache_passphrase(signer, &entered)?;
                entered
            }
        };

        let signature = vault.sign_json(signer, &passphrase, &sign_bytes)?;
        println!("{}", signature.to_json()?);
    }

    output::success(&format!("Signed {} transaction(s)", files.len()));

    Ok(())
}
