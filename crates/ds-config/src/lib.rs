//! # ds-config
//!
//! Layered configuration loading for designsync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DSYNC_*` prefix, `__` as separator)
//! 2. Project-level `.dsync/config.toml`
//! 3. User-level `~/.config/dsync/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DSYNC_API__TOKEN` -> `api.token`, `DSYNC_VAULT__GROUP_BY_SECTION`
//! -> `vault.group_by_section`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use ds_config::DsyncConfig;
//!
//! let config = DsyncConfig::load_with_dotenv().expect("config");
//! config.validate_for_sync().expect("token and vault path set");
//! println!("syncing into {}", config.vault.path);
//! ```

mod api;
mod error;
mod filter;
mod render;
mod vault;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use filter::FilterConfig;
pub use render::RenderConfig;
pub use vault::{VaultBackend, VaultConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DsyncConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    /// Project synced when no project is given on the command line.
    #[serde(default)]
    pub default_project: String,
}

impl DsyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load `.env` from the current directory, then all other sources.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".dsync/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DSYNC_").split("__"))
    }

    /// Path to the user-global config file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dsync").join("config.toml"))
    }

    /// Configured default project, if any.
    pub fn default_project(&self) -> Option<&str> {
        let trimmed = self.default_project.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Check everything a sync run needs before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the API token or vault path
    /// is missing, and [`ConfigError::InvalidValue`] for out-of-range numbers.
    pub fn validate_for_sync(&self) -> Result<(), ConfigError> {
        self.validate_for_api()?;
        if !self.vault.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "vault".into(),
                hint: "set vault.path or DSYNC_VAULT__PATH, or pass --vault".into(),
            });
        }
        Ok(())
    }

    /// Check the settings needed to talk to the design API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the token is missing or the retry and
    /// timeout settings are zero.
    pub fn validate_for_api(&self) -> Result<(), ConfigError> {
        if !self.api.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "api".into(),
                hint: "set api.token or DSYNC_API__TOKEN".into(),
            });
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.api.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DsyncConfig::default();
        assert!(!config.api.is_configured());
        assert!(!config.vault.is_configured());
        assert_eq!(config.default_project(), None);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: DsyncConfig = DsyncConfig::figment().extract()?;
            assert!(!config.api.is_configured());
            assert_eq!(config.vault.root, "Zeplin");
            Ok(())
        });
    }

    #[test]
    fn missing_token_fails_validation() {
        let config = DsyncConfig::default();
        let err = config.validate_for_sync().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section, .. } if section == "api"));
    }

    #[test]
    fn missing_vault_path_fails_validation() {
        let mut config = DsyncConfig::default();
        config.api.token = "tok".into();
        assert!(config.validate_for_api().is_ok());
        let err = config.validate_for_sync().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section, .. } if section == "vault"));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let mut config = DsyncConfig::default();
        config.api.token = "tok".into();
        config.api.max_attempts = 0;
        let err = config.validate_for_api().unwrap_err();
        assert!(err.to_string().contains("api.max_attempts"));
    }

    #[test]
    fn default_project_is_trimmed() {
        let config = DsyncConfig {
            default_project: "  p-42 ".into(),
            ..Default::default()
        };
        assert_eq!(config.default_project(), Some("p-42"));
    }
}
