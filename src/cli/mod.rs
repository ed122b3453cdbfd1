//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{ColdVaultError, Result};
use crate::vault::Vault;

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "COLDVAULT_PASSPHRASE";

/// Environment variable holding the new passphrase for `passwd`.
pub const NEW_PASSPHRASE_ENV: &str = "COLDVAULT_NEW_PASSPHRASE";

/// ColdVault CLI: offline key vault and signer for CoinEx Chain accounts.
#[derive(Parser)]
#[command(
    name = "coldvault",
    about = "Offline key vault, vanity address generator and transaction signer",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_file` from .coldvault.toml, else coldvault.json)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Search for a vanity address and store its mnemonic
    Create {
        /// Characters the address must start with, after `coinex1`
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Characters the address must end with
        #[arg(short, long, default_value = "")]
        suffix: String,

        /// Label for the new account
        #[arg(short, long)]
        memo: String,

        /// Search threads (default: one per CPU)
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Store an existing mnemonic (read from stdin or a hidden prompt)
    Import {
        /// Label for the account
        #[arg(short, long)]
        memo: String,
    },

    /// List all accounts
    List,

    /// Print an account's mnemonic
    Show {
        /// Account address
        address: String,
    },

    /// Change an account's passphrase
    Passwd {
        /// Account address
        address: String,
    },

    /// Delete an account
    Delete {
        /// Account address
        address: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Sign JSON transaction files and print the signatures
    Sign {
        /// Transaction description files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check that a string only uses characters valid in an address
    Check {
        /// Candidate prefix or suffix
        text: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.coldvault.toml` from the working directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Build the full path to the vault file from the CLI arguments.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(settings.vault_path(&cwd, cli.vault.as_deref()))
}

/// Open (or create) the vault named by the CLI arguments and settings.
pub fn open_vault(cli: &Cli, settings: &Settings) -> Result<Vault> {
    let path = vault_path(cli, settings)?;
    Vault::open_with_cache_ttl(&path, settings.cache_ttl())
}

/// Get an account passphrase, trying in order:
/// 1. `COLDVAULT_PASSPHRASE` env var (scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_passphrase(prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = env_secret(PASSPHRASE_ENV) {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| ColdVaultError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new passphrase twice.
///
/// `env_var` is checked first for scripted use.  Two different entries
/// fail with `PassphraseMismatch`.
pub fn prompt_new_passphrase(env_var: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = env_secret(env_var) {
        return Ok(pw);
    }

    let first = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Choose passphrase")
            .interact()
            .map_err(|e| ColdVaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
    );
    let second = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Repeat passphrase")
            .interact()
            .map_err(|e| ColdVaultError::CommandFailed(format!("passphrase prompt: {e}")))?,
    );

    if first.as_str() != second.as_str() {
        return Err(ColdVaultError::PassphraseMismatch);
    }
    Ok(first)
}

/// Read a mnemonic from piped stdin, or from a hidden prompt on a terminal.
pub fn read_mnemonic() -> Result<Zeroizing<String>> {
    let stdin = std::io::stdin();

    let raw = if stdin.is_terminal() {
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Enter mnemonic")
                .interact()
                .map_err(|e| ColdVaultError::CommandFailed(format!("mnemonic prompt: {e}")))?,
        )
    } else {
        let mut line = Zeroizing::new(String::new());
        stdin.lock().read_line(&mut *line)?;
        line
    };

    Ok(Zeroizing::new(normalize_mnemonic(&raw)))
}

/// Collapse runs of whitespace and lowercase the words.
pub fn normalize_mnemonic(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn env_secret(var: &str) -> Option<Zeroizing<String>> {
    match std::env::var(var) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_defaults() {
        let cli = Cli::try_parse_from(["coldvault", "create", "--memo", "savings", "-p", "abc"]).unwrap();
        match cli.command {
            Commands::Create {
                prefix,
                suffix,
                memo,
                workers,
            } => {
                assert_eq!(prefix, "abc");
                assert_eq!(suffix, "");
                assert_eq!(memo, "savings");
                assert_eq!(workers, None);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn vault_flag_is_global() {
        let cli = Cli::try_parse_from(["coldvault", "list", "--vault", "v.json"]).unwrap();
        assert_eq!(cli.vault, Some(PathBuf::from("v.json")));
    }

    #[test]
    fn sign_requires_a_file() {
        assert!(Cli::try_parse_from(["coldvault", "sign"]).is_err());
    }

    #[test]
    fn mnemonic_normalization() {
        assert_eq!(
            normalize_mnemonic("  Abandon\tabandon \n about\n"),
            "abandon abandon about"
        );
    }
}
