use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ColdVaultError, Result};

/// Configuration, loaded from `.coldvault.toml`.
///
/// Every field has a sensible default so ColdVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file, relative to the working directory unless absolute.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Vanity search threads; 0 means one per logical CPU.
    #[serde(default)]
    pub workers: usize,

    /// Seconds a verified passphrase stays cached.
    #[serde(default = "default_passphrase_cache_secs")]
    pub passphrase_cache_secs: u64,

    /// Warn before a search constraining more than this many characters.
    #[serde(default = "default_long_search_warning")]
    pub long_search_warning: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "coldvault.json".to_string()
}

fn default_passphrase_cache_secs() -> u64 {
    300 // 5 minutes
}

fn default_long_search_warning() -> usize {
    7
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            workers: 0,
            passphrase_cache_secs: default_passphrase_cache_secs(),
            long_search_warning: default_long_search_warning(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".coldvault.toml";

    /// Load settings from `<dir>/.coldvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            ColdVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the vault file.
    ///
    /// `override_path` (the `--vault` flag) wins over `vault_file`.
    pub fn vault_path(&self, dir: &Path, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(p) => dir.join(p),
            None => dir.join(&self.vault_file),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.passphrase_cache_secs)
    }

    /// Worker count for vanity search, resolving 0 to the CPU count.
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            crate::vanity::default_worker_count()
        } else {
            self.workers
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
