//! Centralized configuration management for trialcapture

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Logged-in staff user, stamped on every saved record
    pub user_id: Option<String>,
    /// Rows per page on list screens
    pub page_size: usize,
    /// File used to remember the selected participant and tab
    pub ui_state_path: PathBuf,
    /// Prefix for zero-padded study ids (`CS` -> `CS-0001`)
    pub study_prefix: String,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            user_agent: "trialcapture/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            user_id: None,
            page_size: 10,
            ui_state_path: "./trialcapture-state.json".into(),
            study_prefix: "CS".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api = ApiConfig {
            base_url: std::env::var("TRIAL_API_BASE_URL")
                .unwrap_or(defaults.api.base_url),
            timeout_seconds: parse_env_var("TRIAL_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.api.timeout_seconds),
            user_agent: std::env::var("TRIAL_USER_AGENT")
                .unwrap_or(defaults.api.user_agent),
        };

        let user_id = std::env::var("TRIAL_USER_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        let page_size = parse_env_var("TRIAL_PAGE_SIZE")?.unwrap_or(defaults.page_size);

        let ui_state_path = std::env::var("TRIAL_UI_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.ui_state_path);

        let study_prefix = std::env::var("TRIAL_STUDY_PREFIX")
            .unwrap_or(defaults.study_prefix);

        Ok(Config {
            api,
            user_id,
            page_size,
            ui_state_path,
            study_prefix,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                self.api.base_url
            ));
        }

        if self.page_size == 0 {
            return Err(anyhow::anyhow!("Page size must be greater than zero"));
        }

        if let Some(parent) = self.ui_state_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Cannot create UI state directory: {}", parent.display())
                })?;
            }
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
