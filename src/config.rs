use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    BASE_URL, DATABASE_NAME, DEFAULT_DIET_TYPE, DEFAULT_MEAL_TYPE, DEFAULT_RECIPES_NUMBER,
};

/// Main application configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Recipe API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Defaults used when building recipe queries
    #[serde(default)]
    pub defaults: QueryDefaults,
    /// Local cache database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Configuration for the Spoonacular API
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL for API endpoint (for proxies and tests)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key (can also be set via SPOONACULAR_API_KEY)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Config value first, then the SPOONACULAR_API_KEY environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Fallback values for the meal/diet filter and page size
#[derive(Debug, Deserialize, Clone)]
pub struct QueryDefaults {
    #[serde(default = "default_recipes_number")]
    pub recipes_number: String,
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    #[serde(default = "default_diet_type")]
    pub diet_type: String,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            recipes_number: default_recipes_number(),
            meal_type: default_meal_type(),
            diet_type: default_diet_type(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// SQLite file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    pub fn resolve_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_database_path)
    }
}

// Default value functions
fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_recipes_number() -> String {
    DEFAULT_RECIPES_NUMBER.to_string()
}

fn default_meal_type() -> String {
    DEFAULT_MEAL_TYPE.to_string()
}

fn default_diet_type() -> String {
    DEFAULT_DIET_TYPE.to_string()
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mealmuse")
        .join(DATABASE_NAME)
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALMUSE__ prefix
    /// 2. mealmuse.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALMUSE__API__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("mealmuse").required(false))
        // Use double underscore for nested: MEALMUSE__DEFAULTS__DIET_TYPE
        .add_source(
            Environment::with_prefix("MEALMUSE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_base_url(), "https://api.spoonacular.com");
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_recipes_number(), "50");
        assert_eq!(default_meal_type(), "main course");
        assert_eq!(default_diet_type(), "gluten free");
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.defaults.meal_type, "main course");
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_database_path_override() {
        let config = DatabaseConfig {
            path: Some(PathBuf::from("/tmp/mealmuse-test.sqlite")),
        };
        assert_eq!(
            config.resolve_path(),
            PathBuf::from("/tmp/mealmuse-test.sqlite")
        );
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = DatabaseConfig::default().resolve_path();
        assert!(path.ends_with("mealmuse/recipes_db.sqlite"));
    }

    #[test]
    fn test_configured_api_key_wins() {
        let api = ApiConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(api.resolve_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "[api]\napi_key = \"abc\"\n\n[defaults]\ndiet_type = \"vegan\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("abc"));
        assert_eq!(config.api.base_url, BASE_URL);
        assert_eq!(config.defaults.diet_type, "vegan");
        assert_eq!(config.defaults.meal_type, "main course");
    }
}
