use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{SESSION_KEY, Session, SessionStore};

/// Keeps sessions in a JSON object file mapping keys to records:
/// ```json
/// {
///   "entitylog_session": { "saved_at": "...", "files": [ ... ] }
/// }
/// ```
/// Other keys in the file are preserved.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("session file {} is not a JSON object", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec(map)?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let mut map = self.read_map().await?;
        let Some(value) = map.remove(SESSION_KEY) else {
            return Ok(None);
        };
        let session: Session = serde_json::from_value(value)
            .with_context(|| format!("malformed session in {}", self.path.display()))?;
        debug!(files = session.files.len(), "Session loaded");
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut map = self.read_map().await?;
        map.insert(SESSION_KEY.to_string(), serde_json::to_value(session)?);
        self.write_map(&map).await?;
        debug!(path = %self.path.display(), files = session.files.len(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut map = self.read_map().await?;
        if map.remove(SESSION_KEY).is_none() {
            return Ok(());
        }
        if map.is_empty() {
            tokio::fs::remove_file(&self.path).await?;
        } else {
            self.write_map(&map).await?;
        }
        debug!(path = %self.path.display(), "Session cleared");
        Ok(())
    }
}
