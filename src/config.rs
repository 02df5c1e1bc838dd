use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Errors raised while assembling [`Settings`]
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged configuration holds out-of-range values
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Runtime settings of the forecast service.
///
/// Keys map one-to-one onto environment variables (`RATE_LIMIT_PER_MIN` sets
/// `rate_limit_per_min`), which take precedence over an optional config file,
/// which in turn overrides the built-in defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// Listen address, IP:PORT
    #[validate(length(min = 1))]
    pub bind_address: String,

    /// Origins allowed by CORS; `*` mirrors any origin
    pub allow_origins: Vec<String>,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,

    pub rate_limit_enabled: bool,

    /// Tokens refilled per minute
    #[validate(range(min = 1))]
    pub rate_limit_per_min: u32,

    /// Bucket capacity, defaults to the per-minute rate
    #[validate(range(min = 1))]
    pub rate_limit_burst: Option<u32>,

    /// Only paths starting with this prefix are rate limited
    pub rate_limit_path_prefix: String,

    /// Trust the first `X-Forwarded-For` hop as the client address
    pub rate_limit_behind_proxy: bool,

    /// Log every documented route on startup
    pub log_routes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            allow_origins: vec!["http://localhost:3000".to_string()],
            request_timeout_secs: 30,
            rate_limit_enabled: true,
            rate_limit_per_min: 30,
            rate_limit_burst: None,
            rate_limit_path_prefix: "/api/".to_string(),
            rate_limit_behind_proxy: false,
            log_routes: false,
        }
    }
}

impl Settings {
    /// Loads settings from defaults, an optional config file and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let mut builder = Self::defaults()?;
        if let Some(path) = config_file {
            tracing::debug!("Reading configuration file: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::default()
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("allow_origins"),
        );

        Self::from_builder(builder)
    }

    /// Builder pre-populated with the default of every key.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let defaults = Self::default();
        let builder = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("allow_origins", defaults.allow_origins)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("rate_limit_enabled", defaults.rate_limit_enabled)?
            .set_default("rate_limit_per_min", i64::from(defaults.rate_limit_per_min))?
            .set_default("rate_limit_path_prefix", defaults.rate_limit_path_prefix)?
            .set_default("rate_limit_behind_proxy", defaults.rate_limit_behind_proxy)?
            .set_default("log_routes", defaults.log_routes)?;
        Ok(builder)
    }

    /// Finishes a builder into validated settings.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Bucket capacity actually used by the rate limiter.
    pub fn effective_burst(&self) -> u32 {
        self.rate_limit_burst.unwrap_or(self.rate_limit_per_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, SettingsError> {
        let builder = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));
        Settings::from_builder(builder)
    }

    #[test]
    fn test_defaults_round_trip_through_builder() {
        let settings = Settings::from_builder(Settings::defaults().unwrap()).unwrap();

        assert_eq!(settings.bind_address, "0.0.0.0:3000");
        assert_eq!(settings.allow_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.request_timeout_secs, 30);
        assert!(settings.rate_limit_enabled);
        assert_eq!(settings.rate_limit_per_min, 30);
        assert_eq!(settings.rate_limit_burst, None);
        assert_eq!(settings.rate_limit_path_prefix, "/api/");
        assert!(!settings.rate_limit_behind_proxy);
        assert!(!settings.log_routes);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = from_toml(
            r#"
            bind_address = "127.0.0.1:8080"
            allow_origins = ["https://example.com", "http://localhost:3000"]
            rate_limit_per_min = 120
            rate_limit_burst = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert_eq!(settings.allow_origins.len(), 2);
        assert_eq!(settings.rate_limit_per_min, 120);
        assert_eq!(settings.effective_burst(), 10);
        // untouched keys keep their defaults
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_burst_defaults_to_rate() {
        let settings = from_toml("rate_limit_per_min = 45").unwrap();
        assert_eq!(settings.effective_burst(), 45);
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        let result = from_toml("rate_limit_per_min = 0");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_excessive_timeout_is_rejected() {
        let result = from_toml("request_timeout_secs = 86400");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_wrong_type_is_a_load_error() {
        let result = from_toml(r#"rate_limit_per_min = "lots""#);
        assert!(matches!(result, Err(SettingsError::Load(_))));
    }
}
