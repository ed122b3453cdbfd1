//! Configuration loaded from `.coldvault.toml`.

pub mod settings;

pub use settings::Settings;
