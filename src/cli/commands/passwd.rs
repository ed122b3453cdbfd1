//! `coldvault passwd`: change an account's passphrase.
//!
//! The mnemonic is decrypted with the current passphrase and re-encrypted
//! under the new one.  The memo and list position are unchanged.

use crate::cli::output;
use crate::cli::{
    load_settings, open_vault, prompt_new_passphrase, prompt_passphrase, Cli, NEW_PASSPHRASE_ENV,
};
use crate::errors::Result;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli, address: &str) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    // 1. Verify the current passphrase before asking for a new one.
    let old = prompt_passphrase(&format!("Current passphrase for {address}"))?;
    vault.check_passphrase(address, &old)?;

    // 2. Choose the new one.
    output::info("Choose the new passphrase.");
    let new = prompt_new_passphrase(NEW_PASSPHRASE_ENV)?;

    // 3. Re-encrypt and save.
    vault.change_passphrase(address, &old, &new)?;

    output::success(&format!("Passphrase changed for {address}"));

    Ok(())
}
