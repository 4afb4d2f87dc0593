//! CLI command implementations.
//!
//! # Environment Variables
//!
//! Read through [`FinderConfig::from_env`]; the ones that matter here:
//!
//! - `MAPS_API_KEY` - Live store search (otherwise the demo stores are used)
//! - `CLAUDE_API_KEY` - Required by `fms chat`
//! - `FMS_DEFAULT_CITY` - City for `fms stores` and `fms subscribe` without `--city`
//! - `FMS_CURRENCY` - Currency symbol used in output
//! - `INVENTORY_SEED` - Reproducible generated inventory

pub mod alerts;
pub mod chat;
pub mod pricing;
pub mod shopping;
pub mod stores;

use findmystore_core::{SessionId, Store};
use findmystore_server::FinderConfig;
use findmystore_server::claude::ClaudeError;
use findmystore_server::config::ConfigError;
use findmystore_server::maps::{MapsClient, MapsError};
use findmystore_server::services::registry::{StoreDirectory, StoreQuery};
use findmystore_server::services::session::{FinderSession, SessionStore};
use thiserror::Error;

use crate::ScopeArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Maps error: {0}")]
    Maps(#[from] MapsError),

    #[error("Claude error: {0}")]
    Claude(#[from] ClaudeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shopping-list file could not be parsed.
    #[error("Invalid shopping list {path}: {source}")]
    ShoppingList {
        path: String,
        source: serde_yaml::Error,
    },

    /// Store ID is not in the current store set.
    #[error("Store not found.")]
    StoreNotFound,

    /// A required argument was blank.
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Everything a single CLI invocation works against.
pub struct Context {
    pub config: FinderConfig,
    pub directory: StoreDirectory,
    pub session: FinderSession,
}

impl Context {
    /// Load configuration and start a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the Maps client cannot
    /// be built.
    pub fn load() -> Result<Self, CliError> {
        let config = FinderConfig::from_env()?;
        let maps = config.maps().map(MapsClient::new).transpose()?;
        let session = SessionStore::from_config(&config).new_session(SessionId::generate());

        tracing::debug!(
            session_id = %session.id(),
            live_maps = maps.is_some(),
            "CLI session started"
        );

        Ok(Self {
            directory: StoreDirectory::new(maps),
            session,
            config,
        })
    }

    /// Fetch stores into the session when the scope names a city.
    ///
    /// Returns the fetched stores, or `None` when the session keeps its
    /// current search space.
    ///
    /// # Errors
    ///
    /// Returns an error if the Maps lookup fails.
    pub async fn refresh(&mut self, scope: &ScopeArgs) -> Result<Option<Vec<Store>>, CliError> {
        let Some(city) = non_empty(scope.city.as_deref()) else {
            return Ok(None);
        };
        let stores = self
            .session
            .fetch_stores(&self.directory, &query_for(city, scope))
            .await?;
        Ok(Some(stores))
    }
}

/// Build a store query from CLI scope flags.
#[must_use]
pub fn query_for(city: &str, scope: &ScopeArgs) -> StoreQuery {
    StoreQuery::new(city)
        .with_category(scope.category)
        .with_radius_km(scope.radius_km)
        .with_open_now(scope.open_now)
}

/// Trimmed value, or `None` if blank.
#[must_use]
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trimmed product name.
///
/// # Errors
///
/// Returns `Missing` if the name is blank.
pub fn require_product(product: &str) -> Result<&str, CliError> {
    non_empty(Some(product)).ok_or(CliError::Missing("product"))
}
