//! Configuration management for the weekend flight finder
//!
//! Settings are layered: built-in defaults, an optional TOML file,
//! `WEEKEND_FLIGHTS__SECTION__KEY` environment overrides and finally the
//! `START_DATE`, `GMAIL_USER` and `GMAIL_PASSWORD` variables.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File, FileFormat};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::WeekendFlightsError;

/// Optional first departure date, `YYYY-MM-DD`
pub const START_DATE_VAR: &str = "START_DATE";
/// Gmail account used as sender and recipient
pub const GMAIL_USER_VAR: &str = "GMAIL_USER";
/// Gmail (app) password
pub const GMAIL_PASSWORD_VAR: &str = "GMAIL_PASSWORD";

const ENV_PREFIX: &str = "WEEKEND_FLIGHTS";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeekendFlightsConfig {
    /// First weekend to search; the next Friday when unset
    pub start_date: Option<NaiveDate>,
    pub search: SearchConfig,
    pub regions: RegionsConfig,
    pub pricing: PricingConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
}

/// Flight search API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    /// Origin airports (IATA codes), searched in order
    pub origins: Vec<String>,
    /// Sent as the `apikey` header when present
    pub api_key: Option<String>,
    pub partner: String,
    pub currency: String,
    /// Maximum number of offers per search
    pub limit: u32,
    pub timeout_seconds: u32,
}

/// Country metadata lookup settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegionsConfig {
    pub base_url: String,
    pub timeout_seconds: u32,
}

/// Price caps and offer sanity limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Cap for Europe and Morocco, EUR
    pub europe_price: f64,
    /// Cap for every other destination, EUR
    pub world_price: f64,
    /// Offers shorter than this are treated as malformed
    pub min_duration_hours: f64,
}

/// SMTP delivery settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    /// Sender, recipient and SMTP login
    pub username: String,
    pub password: Option<Secret<String>>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_search_base_url() -> String {
    "https://api.skypicker.com".to_string()
}

fn default_origins() -> Vec<String> {
    vec!["BCN".to_string(), "GRO".to_string()]
}

fn default_regions_base_url() -> String {
    "https://restcountries.com/v3.1".to_string()
}

fn default_search_timeout() -> u32 {
    30
}

fn default_regions_timeout() -> u32 {
    10
}

fn default_limit() -> u32 {
    100
}

fn default_europe_price() -> f64 {
    50.0
}

fn default_world_price() -> f64 {
    150.0
}

fn default_min_duration_hours() -> f64 {
    1.0
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_subject() -> String {
    "Ofertas fin de semana".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            origins: default_origins(),
            api_key: None,
            partner: "picky".to_string(),
            currency: "EUR".to_string(),
            limit: default_limit(),
            timeout_seconds: default_search_timeout(),
        }
    }
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_regions_base_url(),
            timeout_seconds: default_regions_timeout(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            europe_price: default_europe_price(),
            world_price: default_world_price(),
            min_duration_hours: default_min_duration_hours(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            subject: default_subject(),
            username: String::new(),
            password: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeekendFlightsConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });
        Self::build(Some(config_file), std::env::vars().collect())
    }

    /// Build the configuration from an optional file and an environment snapshot
    pub fn build(config_file: Option<PathBuf>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.origins")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            )
            .set_override_option("start_date", non_empty(&env, START_DATE_VAR))
            .with_context(|| "Failed to apply START_DATE")?
            .set_override_option("mail.username", non_empty(&env, GMAIL_USER_VAR))
            .with_context(|| "Failed to apply GMAIL_USER")?
            .set_override_option("mail.password", non_empty(&env, GMAIL_PASSWORD_VAR))
            .with_context(|| "Failed to apply GMAIL_PASSWORD")?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeekendFlightsConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weekend-flights").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.search.base_url.is_empty() {
            self.search.base_url = default_search_base_url();
        }
        if self.search.origins.is_empty() {
            self.search.origins = default_origins();
        }
        if self.search.limit == 0 {
            self.search.limit = default_limit();
        }
        if self.search.timeout_seconds == 0 {
            self.search.timeout_seconds = default_search_timeout();
        }
        if self.regions.base_url.is_empty() {
            self.regions.base_url = default_regions_base_url();
        }
        if self.regions.timeout_seconds == 0 {
            self.regions.timeout_seconds = default_regions_timeout();
        }
        if self.mail.smtp_host.is_empty() {
            self.mail.smtp_host = default_smtp_host();
        }
        if self.mail.smtp_port == 0 {
            self.mail.smtp_port = default_smtp_port();
        }
        if self.mail.subject.is_empty() {
            self.mail.subject = default_subject();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        for origin in &mut self.search.origins {
            *origin = origin.trim().to_ascii_uppercase();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_search()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the Gmail account settings
    pub fn validate_credentials(&self) -> Result<()> {
        if self.mail.username.trim().is_empty() {
            return Err(WeekendFlightsError::config(format!(
                "{GMAIL_USER_VAR} must be set to the Gmail address that sends and receives the offers"
            ))
            .into());
        }

        if !self.mail.username.contains('@') {
            return Err(WeekendFlightsError::config(format!(
                "{GMAIL_USER_VAR} '{}' is not an email address",
                self.mail.username
            ))
            .into());
        }

        let has_password = self
            .mail
            .password
            .as_ref()
            .is_some_and(|password| !password.expose_secret().is_empty());
        if !has_password {
            return Err(
                WeekendFlightsError::config(format!("{GMAIL_PASSWORD_VAR} must be set")).into(),
            );
        }

        Ok(())
    }

    /// Validate origin airports
    fn validate_search(&self) -> Result<()> {
        for origin in &self.search.origins {
            if origin.len() != 3 || !origin.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(WeekendFlightsError::config(format!(
                    "Invalid origin airport '{origin}'. Expected a 3-letter IATA code"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.search.limit > 1000 {
            return Err(
                WeekendFlightsError::config("Search result limit cannot exceed 1000").into(),
            );
        }

        if self.search.timeout_seconds > 300 || self.regions.timeout_seconds > 300 {
            return Err(
                WeekendFlightsError::config("HTTP timeouts cannot exceed 300 seconds").into(),
            );
        }

        let pricing = &self.pricing;
        if pricing.europe_price <= 0.0 || pricing.world_price <= 0.0 {
            return Err(WeekendFlightsError::config("Price caps must be positive").into());
        }

        if pricing.europe_price > pricing.world_price {
            return Err(WeekendFlightsError::config(
                "Europe price cap cannot be higher than the world price cap",
            )
            .into());
        }

        if pricing.min_duration_hours < 0.0 {
            return Err(
                WeekendFlightsError::config("Minimum flight duration cannot be negative").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeekendFlightsError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeekendFlightsError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.search.base_url, &self.regions.base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeekendFlightsError::config(format!(
                    "API base URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

fn non_empty(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> HashMap<String, String> {
        HashMap::from([
            (GMAIL_USER_VAR.to_string(), "deals@gmail.com".to_string()),
            (GMAIL_PASSWORD_VAR.to_string(), "app-password".to_string()),
        ])
    }

    #[test]
    fn test_default_config() {
        let config = WeekendFlightsConfig::default();
        assert_eq!(config.search.base_url, "https://api.skypicker.com");
        assert_eq!(config.search.origins, vec!["BCN", "GRO"]);
        assert_eq!(config.search.limit, 100);
        assert_eq!(config.pricing.europe_price, 50.0);
        assert_eq!(config.pricing.world_price, 150.0);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.smtp_port, 465);
        assert_eq!(config.logging.level, "info");
        assert!(config.start_date.is_none());
    }

    #[test]
    fn test_build_reads_start_date_and_gmail_variables() {
        let mut env = credentials();
        env.insert(START_DATE_VAR.to_string(), "2026-11-06".to_string());
        env.insert("PATH".to_string(), "/usr/bin".to_string());

        let config = WeekendFlightsConfig::build(None, env).unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2026, 11, 6));
        assert_eq!(config.mail.username, "deals@gmail.com");
        assert_eq!(
            config.mail.password.as_ref().unwrap().expose_secret(),
            "app-password"
        );
    }

    #[test]
    fn test_empty_start_date_is_ignored() {
        let mut env = credentials();
        env.insert(START_DATE_VAR.to_string(), "  ".to_string());

        let config = WeekendFlightsConfig::build(None, env).unwrap();
        assert!(config.start_date.is_none());
    }

    #[test]
    fn test_invalid_start_date_is_rejected() {
        let mut env = credentials();
        env.insert(START_DATE_VAR.to_string(), "16/10/2026".to_string());

        assert!(WeekendFlightsConfig::build(None, env).is_err());
    }

    #[test]
    fn test_prefixed_overrides() {
        let mut env = credentials();
        env.insert(
            "WEEKEND_FLIGHTS__SEARCH__ORIGINS".to_string(),
            "mad, vlc".to_string(),
        );
        env.insert(
            "WEEKEND_FLIGHTS__PRICING__EUROPE_PRICE".to_string(),
            "40".to_string(),
        );

        let config = WeekendFlightsConfig::build(None, env).unwrap();
        assert_eq!(config.search.origins, vec!["MAD", "VLC"]);
        assert_eq!(config.pricing.europe_price, 40.0);
        assert_eq!(config.pricing.world_price, 150.0);
    }

    #[test]
    fn test_missing_credentials_are_rejected() {
        let result = WeekendFlightsConfig::build(None, HashMap::new());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains(GMAIL_USER_VAR));

        let env = HashMap::from([(GMAIL_USER_VAR.to_string(), "deals@gmail.com".to_string())]);
        let result = WeekendFlightsConfig::build(None, env);
        assert!(result.unwrap_err().to_string().contains(GMAIL_PASSWORD_VAR));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WeekendFlightsConfig::build(None, credentials()).unwrap();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_price_caps() {
        let mut config = WeekendFlightsConfig::build(None, credentials()).unwrap();
        config.pricing.europe_price = 200.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Europe price cap"));
    }

    #[test]
    fn test_config_validation_origin() {
        let mut config = WeekendFlightsConfig::build(None, credentials()).unwrap();
        config.search.origins = vec!["BARCELONA".to_string()];
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("IATA"));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WeekendFlightsConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("weekend-flights"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
