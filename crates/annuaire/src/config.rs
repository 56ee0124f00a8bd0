//! Settings for the `annuaire` binary.
//!
//! Three layers are merged with figment, later ones winning:
//! built-in defaults, the TOML file, then `ANNUAIRE_*` environment variables.
//! Nested keys use a double underscore, so `ANNUAIRE_STATS__TOP_JOBS=3` sets
//! `stats.top_jobs`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::{FilterBy, SortBy};
use crate::stats::StatsOptions;
use crate::view::ViewMode;

const APP_DIR: &str = "annuaire";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "annuaire.db";
const ENV_PREFIX: &str = "ANNUAIRE_";

/// Longest accepted statistics window, in days.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Everything the binary can be told from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the directory is kept.
    pub storage: StorageConfig,
    /// What a new directory starts with.
    pub directory: DirectoryConfig,
    /// Windows used by `stats`.
    pub stats: StatsOptions,
    /// Defaults for `list`.
    pub display: DisplayConfig,
}

/// `[storage]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. Unset means `<data dir>/annuaire/annuaire.db`.
    pub database_path: Option<PathBuf>,
}

/// `[directory]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Fill a new or unreadable directory with the demo people.
    pub seed_demo_data: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Cards or rows.
    pub view_mode: ViewMode,
    /// Fields a search looks at.
    pub filter_by: FilterBy,
    /// Result order.
    pub sort_by: SortBy,
}

impl Config {
    /// Load from the default file location and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is out of range.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load using `config_path` instead of the default file, when given.
    ///
    /// A missing file is not an error; its layer is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value is out of range.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let path = config_path.unwrap_or_else(Self::default_config_path);
        let config: Self = Self::figment(&path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The merged provider stack for the file at `path`.
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `<config dir>/annuaire/config.toml`
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// `<local data dir>/annuaire`
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR)
    }

    /// Reject values the statistics cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("stats.recent_days", self.stats.recent_days),
            ("stats.average_window_days", self.stats.average_window_days),
        ];
        for (key, days) in windows {
            if days == 0 {
                return Err(Error::invalid_config(format!(
                    "{key} must be greater than 0"
                )));
            }
            if days > MAX_WINDOW_DAYS {
                return Err(Error::invalid_config(format!(
                    "{key} must be at most {MAX_WINDOW_DAYS}"
                )));
            }
        }

        if self.stats.top_jobs == 0 {
            return Err(Error::invalid_config("stats.top_jobs must be greater than 0"));
        }

        Ok(())
    }

    /// Configured database file, or the default one.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        match &self.storage.database_path {
            Some(path) => path.clone(),
            None => Self::default_data_dir().join(DATABASE_FILE),
        }
    }
}
