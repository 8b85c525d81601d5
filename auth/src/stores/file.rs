//! File-backed session vault.
//!
//! Stores the session as one JSON file. Writes go to a temp sibling and
//! are renamed into place, so a crash mid-write leaves either the old
//! record or the new one, never a torn file.

use crate::error::{AuthError, Result};
use crate::providers::SessionVault;
use crate::state::PersistedSession;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Session vault backed by a single JSON file.
///
/// # Example
///
/// ```no_run
/// use stagepass_auth::stores::FileSessionVault;
///
/// let vault = FileSessionVault::new("/data/stagepass/session.json");
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionVault {
    path: PathBuf,
}

impl FileSessionVault {
    /// Create a vault at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SessionVault for FileSessionVault {
    async fn load(&self) -> Result<Option<PersistedSession>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| AuthError::Serialization(e.to_string()))
    }

    async fn store(&self, record: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| AuthError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AuthProviderTag, User};
    use chrono::Utc;

    fn sample_record() -> PersistedSession {
        PersistedSession {
            token: "jwt.token.here".to_string(),
            user: User {
                id: "usr_1".to_string(),
                name: "Test User".to_string(),
                email: "test@example.com".to_string(),
                phone: Some("+14155550123".to_string()),
                provider: AuthProviderTag::Email,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileSessionVault::new(dir.path().join("session.json"));

        assert_eq!(vault.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileSessionVault::new(dir.path().join("session.json"));
        let record = sample_record();

        vault.store(&record).await.unwrap();
        assert_eq!(vault.load().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileSessionVault::new(dir.path().join("nested/deeper/session.json"));

        vault.store(&sample_record()).await.unwrap();
        assert!(vault.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileSessionVault::new(dir.path().join("session.json"));

        vault.store(&sample_record()).await.unwrap();
        vault.clear().await.unwrap();
        assert_eq!(vault.load().await.unwrap(), None);

        // Clearing again with nothing stored still succeeds
        vault.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let vault = FileSessionVault::new(path);
        assert!(matches!(
            vault.load().await,
            Err(AuthError::Serialization(_))
        ));
    }
}
