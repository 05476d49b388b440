//! File-based Session Repository Adapter
//!
//! Stores each session as a YAML file on disk, one directory per session
//! for easy navigation and debugging.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionRepository, SessionStoreError};

const SESSION_FILE: &str = "session.yaml";

/// File-based storage for sessions
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    base_path: PathBuf,
}

impl FileSessionRepository {
    /// Create a new file repository with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let repo = FileSessionRepository::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_dir(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(id.to_string())
    }

    fn session_file_path(&self, id: &SessionId) -> PathBuf {
        self.session_dir(id).join(SESSION_FILE)
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        let yaml = match fs::read_to_string(self.session_file_path(id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let session = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let dir = self.session_dir(session.id());
        fs::create_dir_all(&dir).await?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        // Write-then-rename: the session file is never left half-written.
        let tmp = dir.join(format!("{}.tmp", SESSION_FILE));
        fs::write(&tmp, yaml).await?;
        fs::rename(&tmp, self.session_file_path(session.id())).await?;

        tracing::debug!(session_id = %session.id(), "Session saved");
        Ok(())
    }
}
