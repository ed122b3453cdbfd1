//! `coldvault show`: print an account's mnemonic.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_passphrase, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, address: &str) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    let passphrase = prompt_passphrase(&format!("Passphrase for {address}"))?;

    // Decryption only runs after the checksum accepts the passphrase.
    vault.check_passphrase(address, &passphrase)?;
    let mnemonic = vault.get_mnemonic(address, &passphrase)?;

    if let Some(account) = vault.account(address) {
        output::info(&format!("{} ({})", account.address, account.memo));
    }
    println!("{}", mnemonic.as_str());

    Ok(())
}
