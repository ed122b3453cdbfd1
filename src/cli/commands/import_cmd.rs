//! `coldvault import`: store an existing mnemonic.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_new_passphrase, read_mnemonic, Cli, PASSPHRASE_ENV};
use crate::errors::{ColdVaultError, Result};
use crate::keys::derive_keypair;

/// Execute the `import` command.
pub fn execute(cli: &Cli, memo: &str) -> Result<()> {
    if memo.is_empty() {
        return Err(ColdVaultError::EmptyMemo);
    }

    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    let mnemonic = read_mnemonic()?;
    // Validates the phrase and gives us the address up front.
    let keypair = derive_keypair(&mnemonic)?;

    if vault.has_account(keypair.address()) {
        output::warning(&format!(
            "{} is already in the vault; its entry will be replaced.",
            keypair.address()
        ));
    }

    let passphrase = prompt_new_passphrase(PASSPHRASE_ENV)?;
    let account = vault.create_account(memo, &mnemonic, &passphrase)?;

    output::success(&format!("Imported account {} ({memo})", account.address));

    Ok(())
}
