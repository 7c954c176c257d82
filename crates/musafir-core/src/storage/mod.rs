mod config;
pub mod database;
pub mod store;

pub use config::{Config, JournalConfig, LoggingConfig, NotificationsConfig, StorageConfig};
pub use database::SqliteStore;
pub use store::{MemoryStore, ProgressStore};

use std::path::PathBuf;

/// Returns the directory holding `config.toml` and the progress database.
///
/// `MUSAFIR_HOME` overrides the location outright. Otherwise this is
/// `~/.config/musafir[-dev]/`, with the `-dev` suffix when `MUSAFIR_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("MUSAFIR_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MUSAFIR_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("musafir-dev")
            } else {
                base_dir.join("musafir")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
