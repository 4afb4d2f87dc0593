//! Application state shared across handlers.

use std::sync::Arc;

use findmystore_core::SessionId;

use crate::claude::{ClaudeClient, ClaudeError};
use crate::config::FinderConfig;
use crate::error::AppError;
use crate::maps::{MapsClient, MapsError};
use crate::services::registry::StoreDirectory;
use crate::services::session::{SessionStore, SharedSession};

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("maps client: {0}")]
    Maps(#[from] MapsError),
    #[error("claude client: {0}")]
    Claude(#[from] ClaudeError),
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FinderConfig,
    directory: StoreDirectory,
    claude: Option<ClaudeClient>,
    sessions: SessionStore,
}

impl AppState {
    /// Build state from configuration, creating API clients for every
    /// configured key.
    ///
    /// # Errors
    ///
    /// Returns error if an API client cannot be constructed.
    pub fn new(config: FinderConfig) -> Result<Self, StateError> {
        let maps = config.maps().map(MapsClient::new).transpose()?;
        let claude = config.claude().map(ClaudeClient::new).transpose()?;
        let sessions = SessionStore::from_config(&config);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                directory: StoreDirectory::new(maps),
                claude,
                sessions,
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn directory(&self) -> &StoreDirectory {
        &self.inner.directory
    }

    #[must_use]
    pub fn claude(&self) -> Option<&ClaudeClient> {
        self.inner.claude.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Look up a live session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session never existed or has expired.
    pub async fn session(&self, id: SessionId) -> Result<SharedSession, AppError> {
        self.inner
            .sessions
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("session {id}")))
    }
}
