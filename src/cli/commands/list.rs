//! `coldvault list`: display all accounts in a table.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings)?;

    let accounts = vault.accounts();

    output::info(&format!(
        "{} — {} account(s)",
        vault.path().display(),
        accounts.len()
    ));

    output::print_accounts_table(&accounts);

    Ok(())
}
