//! Persistence of the last loaded view.
//!
//! [`SessionStore`] is the async trait for saving, restoring and clearing a
//! [`Session`]. [`FileSessionStore`] implements it over a JSON key-value file.

mod file;

pub use file::FileSessionStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, LogFile};

/// Key under which the session record is stored.
pub const SESSION_KEY: &str = "entitylog_session";

/// The files shown by the last successful render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub saved_at: DateTime<Utc>,
    pub files: Vec<LogFile>,
}

impl Session {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            saved_at: Utc::now(),
            files: state.files.clone(),
        }
    }

    pub fn into_state(self) -> AppState {
        AppState::new(self.files)
    }
}

/// Stores at most one [`Session`].
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the saved session, if there is one.
    async fn load(&self) -> Result<Option<Session>>;
    /// Replaces the saved session.
    async fn save(&self, session: &Session) -> Result<()>;
    /// Forgets the saved session. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}
