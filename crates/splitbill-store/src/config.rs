//! # Application Configuration
//!
//! Settings for where documents live, how edits are persisted and how the
//! engine rounds and validates.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. splitbill.toml (platform config dir, or --config PATH)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. SPLITBILL_* environment variables                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! database_path = "/home/me/.local/share/splitbill/splitbill.db"
//! user_id = "local"
//!
//! [persist]
//! debounce_ms = 400
//!
//! [engine]
//! minor_units = 0       # 0 for IDR, 2 for USD
//! strict = false
//! exclude_no_order = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use splitbill_core::{ValidationMode, DEFAULT_MINOR_UNITS, LOCAL_USER_ID};

use crate::error::{StoreError, StoreResult};
use crate::persist::{PersistConfig, DEFAULT_DEBOUNCE_MS};
use crate::pool::DbConfig;

/// Config file name inside the platform config directory.
const CONFIG_FILE: &str = "splitbill.toml";

/// Database file name inside the platform data directory.
const DATABASE_FILE: &str = "splitbill.db";

/// Upper bound for the persist quiet period.
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Largest scale rust_decimal can represent.
const MAX_MINOR_UNITS: u32 = 28;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "splitbill", "splitbill")
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where documents are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Document key. `local` when nobody is signed in.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}

fn default_user_id() -> String {
    LOCAL_USER_ID.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            user_id: default_user_id(),
        }
    }
}

// =============================================================================
// Persist Settings
// =============================================================================

/// Persist worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistSettings {
    /// Quiet period before an edited document is written (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for PersistSettings {
    fn default() -> Self {
        PersistSettings {
            debounce_ms: default_debounce_ms(),
        }
    }
}

// =============================================================================
// Engine Settings
// =============================================================================

/// How breakdowns are validated and presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Decimal places of the currency's minor unit, used for rounded views.
    #[serde(default = "default_minor_units")]
    pub minor_units: u32,

    /// Reject out-of-range inputs instead of clamping them.
    #[serde(default)]
    pub strict: bool,

    /// Leave people with no priced order out of every share.
    #[serde(default = "default_true")]
    pub exclude_no_order: bool,
}

fn default_minor_units() -> u32 {
    DEFAULT_MINOR_UNITS
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            minor_units: default_minor_units(),
            strict: false,
            exclude_no_order: true,
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub persist: PersistSettings,

    #[serde(default)]
    pub engine: EngineSettings,
}

impl AppConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (splitbill.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        if self.storage.user_id.trim().is_empty() {
            return Err(StoreError::InvalidConfig("user_id must not be empty".into()));
        }

        if self.storage.database_path.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig(
                "database_path must not be empty".into(),
            ));
        }

        if self.persist.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(StoreError::InvalidConfig(format!(
                "debounce_ms must be at most {MAX_DEBOUNCE_MS}, got {}",
                self.persist.debounce_ms
            )));
        }

        if self.engine.minor_units > MAX_MINOR_UNITS {
            return Err(StoreError::InvalidConfig(format!(
                "minor_units must be at most {MAX_MINOR_UNITS}, got {}",
                self.engine.minor_units
            )));
        }

        Ok(())
    }

    /// Applies `SPLITBILL_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SPLITBILL_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Some(user_id) = lookup("SPLITBILL_USER_ID") {
            debug!(user_id = %user_id, "Overriding user id from environment");
            self.storage.user_id = user_id;
        }

        if let Some(debounce) = lookup("SPLITBILL_DEBOUNCE_MS") {
            match debounce.parse::<u64>() {
                Ok(ms) => self.persist.debounce_ms = ms,
                Err(_) => warn!(value = %debounce, "Ignoring non-numeric SPLITBILL_DEBOUNCE_MS"),
            }
        }

        if let Some(units) = lookup("SPLITBILL_MINOR_UNITS") {
            match units.parse::<u32>() {
                Ok(units) => self.engine.minor_units = units,
                Err(_) => warn!(value = %units, "Ignoring non-numeric SPLITBILL_MINOR_UNITS"),
            }
        }

        if let Some(strict) = lookup("SPLITBILL_STRICT") {
            match strict.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.engine.strict = true,
                "0" | "false" | "no" | "off" => self.engine.strict = false,
                _ => warn!(value = %strict, "Unknown SPLITBILL_STRICT value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Database settings for [`Database::new`](crate::pool::Database::new).
    pub fn db_config(&self) -> DbConfig {
        if self.storage.database_path.as_os_str() == crate::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.storage.database_path)
        }
    }

    /// Persist worker settings.
    pub fn persist_config(&self) -> PersistConfig {
        PersistConfig::debounced(self.persist.debounce_ms)
    }

    /// Engine validation mode.
    pub fn validation_mode(&self) -> ValidationMode {
        if self.engine.strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Permissive
        }
    }

    /// Returns the document key.
    pub fn user_id(&self) -> &str {
        &self.storage.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.user_id(), LOCAL_USER_ID);
        assert_eq!(config.persist.debounce_ms, 400);
        assert_eq!(config.engine.minor_units, 0);
        assert!(config.engine.exclude_no_order);
        assert_eq!(config.validation_mode(), ValidationMode::Permissive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.storage.user_id = "  ".to_string();
        assert!(config.validate().is_err());

        config.storage.user_id = "user-1".to_string();
        config.persist.debounce_ms = 120_000;
        assert!(config.validate().is_err());

        config.persist.debounce_ms = 400;
        config.engine.minor_units = 29;
        assert!(config.validate().is_err());

        config.engine.minor_units = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [engine]
            strict = true
            "#,
        )
        .unwrap();

        assert_eq!(config.validation_mode(), ValidationMode::Strict);
        assert!(config.engine.exclude_no_order);
        assert_eq!(config.persist.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.user_id(), LOCAL_USER_ID);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SPLITBILL_DB_PATH", ":memory:"),
            ("SPLITBILL_USER_ID", "user-7"),
            ("SPLITBILL_DEBOUNCE_MS", "50"),
            ("SPLITBILL_MINOR_UNITS", "two"),
            ("SPLITBILL_STRICT", "yes"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.user_id(), "user-7");
        assert_eq!(config.persist.debounce_ms, 50);
        assert_eq!(config.engine.minor_units, 0);
        assert!(config.engine.strict);
        assert!(config.db_config().is_in_memory());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "splitbill-config-test-{}.toml",
            std::process::id()
        ));

        let mut config = AppConfig::default();
        config.engine.minor_units = 2;
        config.storage.user_id = "user-9".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded: AppConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.engine.minor_units, 2);
        assert_eq!(loaded.storage.user_id, "user-9");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[persist]"));
        assert!(toml_str.contains("[engine]"));
    }
}
