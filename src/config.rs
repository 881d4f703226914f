use std::{env, path::PathBuf};

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use cookcal_calendar::CoverageMode;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    /// No timeout when unset, a hung request then keeps the view loading.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CalendarConfig {
    #[serde(default)]
    pub coverage: CoverageMode,
    /// Serve meals from `fixtures` instead of the backend
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COOKCAL__API__BASE_URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("api.base_url", "http://localhost:8080")?
            .set_default("calendar.coverage", "widening")?
            .set_default("calendar.offline", false)?
            .set_default("observability.log_level", "info")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("COOKCAL")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(token) = env::var("COOKCAL_API_TOKEN") {
            builder = builder.set_override("api.access_token", token)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.calendar.offline {
            if self.calendar.fixtures.is_none() {
                return Err("calendar.fixtures must be set when calendar.offline is on".to_string());
            }
            return Ok(());
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(format!(
                "api.base_url must be an http(s) url, got {}",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err("api.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
