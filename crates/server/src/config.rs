//! Finder configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional. Without `MAPS_API_KEY` store searches use the
//! built-in fallback list; without `CLAUDE_API_KEY` the chat agent is disabled.
//!
//! - `FMS_HOST` - Bind address (default: 127.0.0.1)
//! - `FMS_PORT` - Listen port (default: 3000)
//! - `MAPS_API_KEY` - Google Maps key for geocoding and nearby search
//! - `CLAUDE_API_KEY` - Anthropic Claude API key
//! - `CLAUDE_MODEL` - Claude model ID (default: claude-sonnet-4-20250514)
//! - `FMS_DEFAULT_CITY` - City used by the agent when none is given (default: Hyderabad)
//! - `FMS_CURRENCY` - Display currency (default: INR)
//! - `INVENTORY_SEED` - Seed for generated inventory (default: random per session)
//! - `FMS_SESSION_TTL_SECS` - Idle session expiry (default: 3600)
//! - `FMS_MAX_SESSIONS` - Maximum live sessions (default: 10000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sample rates (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use findmystore_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;

use crate::services::registry::DEFAULT_CITY;

const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Finder application configuration.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Google Maps configuration (optional, enables live store search)
    pub maps: Option<MapsConfig>,
    /// Claude AI configuration (optional, enables the chat agent)
    pub claude: Option<ClaudeConfig>,
    /// City the agent searches when the user names none
    pub default_city: String,
    /// Currency used when rendering prices
    pub currency: CurrencyCode,
    /// Seed for every session's inventory random source
    pub inventory_seed: Option<u64>,
    /// Idle time after which a session is dropped
    pub session_ttl: Duration,
    /// Maximum number of live sessions
    pub max_sessions: u64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Google Maps API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MapsConfig {
    /// Google Maps API key
    pub api_key: SecretString,
}

impl std::fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Claude AI API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl Default for FinderConfig {
    /// Offline configuration: fallback stores, no agent, random inventory.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            maps: None,
            claude: None,
            default_city: DEFAULT_CITY.to_string(),
            currency: CurrencyCode::default(),
            inventory_seed: None,
            session_ttl: Duration::from_secs(3600),
            max_sessions: 10_000,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

impl FinderConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed, or
    /// if an API key is an obvious placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default("FMS_HOST", "127.0.0.1")?;
        let port = parse_env_or_default("FMS_PORT", "3000")?;
        let maps = MapsConfig::from_env()?;
        let claude = ClaudeConfig::from_env()?;
        let default_city = get_env_or_default("FMS_DEFAULT_CITY", DEFAULT_CITY);
        let currency = get_env_or_default("FMS_CURRENCY", "INR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("FMS_CURRENCY".to_string(), e))?;
        let inventory_seed = get_optional_env("INVENTORY_SEED")
            .map(|s| {
                s.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("INVENTORY_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let session_ttl =
            Duration::from_secs(parse_env_or_default("FMS_SESSION_TTL_SECS", "3600")?);
        let max_sessions = parse_env_or_default("FMS_MAX_SESSIONS", "10000")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            maps,
            claude,
            default_city,
            currency,
            inventory_seed,
            session_ttl,
            max_sessions,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the Maps configuration, if available.
    ///
    /// Returns `None` if `MAPS_API_KEY` was not set, which keeps store
    /// searches on the fallback list.
    #[must_use]
    pub const fn maps(&self) -> Option<&MapsConfig> {
        self.maps.as_ref()
    }

    /// Returns a reference to the Claude configuration, if available.
    #[must_use]
    pub const fn claude(&self) -> Option<&ClaudeConfig> {
        self.claude.as_ref()
    }
}

impl MapsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        get_optional_env("MAPS_API_KEY")
            .map(|key| {
                check_api_key(&key, "MAPS_API_KEY")?;
                Ok(Self {
                    api_key: SecretString::from(key),
                })
            })
            .transpose()
    }
}

impl ClaudeConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        get_optional_env("CLAUDE_API_KEY")
            .map(|key| {
                check_api_key(&key, "CLAUDE_API_KEY")?;
                Ok(Self {
                    api_key: SecretString::from(key),
                    model: get_env_or_default("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
                })
            })
            .transpose()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Reject placeholder keys outright; warn about low-entropy ones.
fn check_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(key);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        tracing::warn!(
            var = var_name,
            entropy,
            "API key has unusually low entropy"
        );
    }

    Ok(())
}
