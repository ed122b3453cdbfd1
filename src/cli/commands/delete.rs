//! `coldvault delete`: remove an account from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_passphrase, Cli};
use crate::errors::{ColdVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, address: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    if !vault.has_account(address) {
        return Err(ColdVaultError::NoSuchAccount(address.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete account {address}? Without a mnemonic backup its funds are lost."
            ))
            .default(false)
            .interact()
            .map_err(|e| ColdVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let passphrase = prompt_passphrase(&format!("Passphrase for {address}"))?;
    vault.delete_account(address, &passphrase)?;

    output::success(&format!("Deleted account {address}"));

    Ok(())
}
