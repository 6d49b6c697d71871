//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pawpal_core::DEFAULT_OWNER_NAME;
use serde::{Deserialize, Serialize};

/// Default daily time budget for `pawpal plan`, in minutes.
pub const DEFAULT_DAILY_BUDGET_MINUTES: u32 = 120;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Owner name used when the database holds no owner yet.
    pub owner_name: String,

    /// Budget used by `pawpal plan` when `--budget` is not given.
    pub daily_budget_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("pawpal.db"),
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            daily_budget_minutes: DEFAULT_DAILY_BUDGET_MINUTES,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // PAWPAL_DATABASE_PATH, PAWPAL_OWNER_NAME, ...
        figment = figment.merge(Env::prefixed("PAWPAL_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for pawpal.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pawpal"))
}

/// Returns the platform-specific data directory for pawpal.
///
/// On Linux: `~/.local/share/pawpal`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("pawpal"))
}
