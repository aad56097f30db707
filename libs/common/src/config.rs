//! Client configuration
//!
//! Values are layered from built-in defaults, an optional TOML file and
//! `SALON_*` environment variables, in that order of precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::storage::TOKEN_KEY;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default lead time, in whole days, a client needs to edit a booking
pub const DEFAULT_EDIT_WINDOW_DAYS: i64 = 2;

/// Default message shown when a booking can no longer be self-edited
pub const DEFAULT_CONTACT_MESSAGE: &str =
    "To edit this booking, please contact Leila: (99) 99999-9999";

/// Default per-request timeout, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default currency prefix for amounts
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Configuration for the salon client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,
    /// File holding the persisted token
    pub token_path: PathBuf,
    /// Minimum whole days between now and a booking for a client self-edit
    pub edit_window_days: i64,
    /// Message shown when the edit window has closed
    pub contact_message: String,
    /// Currency prefix used when displaying amounts
    pub currency_symbol: String,
    /// Seconds before a backend request is abandoned
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_path: default_token_path(),
            edit_window_days: DEFAULT_EDIT_WINDOW_DAYS,
            contact_message: DEFAULT_CONTACT_MESSAGE.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig from defaults and environment variables
    ///
    /// # Environment Variables
    /// - `SALON_BASE_URL`: backend URL (default: "http://localhost:8080")
    /// - `SALON_TOKEN_PATH`: token file (default: "<config dir>/salon/token")
    /// - `SALON_EDIT_WINDOW_DAYS`: edit lead time in days (default: 2)
    /// - `SALON_CONTACT_MESSAGE`: message shown when editing is refused
    /// - `SALON_CURRENCY_SYMBOL`: currency prefix (default: "R$")
    /// - `SALON_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }

    /// Load configuration, reading `file` first when given
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default(
                "token_path",
                defaults.token_path.to_string_lossy().into_owned(),
            )?
            .set_default("edit_window_days", defaults.edit_window_days)?
            .set_default("contact_message", defaults.contact_message)?
            .set_default("currency_symbol", defaults.currency_symbol)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?;

        if let Some(path) = file {
            info!("Reading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: ClientConfig = builder
            .add_source(Environment::with_prefix("SALON").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.edit_window_days < 0 {
            return Err(ConfigError::Invalid(
                "edit_window_days must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token file under the platform configuration directory, falling back to
/// the working directory
pub fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("salon"))
        .unwrap_or_else(|| PathBuf::from(".salon"))
        .join(TOKEN_KEY)
}
