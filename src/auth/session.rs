// file: src/auth/session.rs
// description: logged-in session record and its json file between commands

use crate::error::{PortalError, Result};
use crate::models::Role;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department_id: Option<String>,
    pub department: String,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if !self.is_admin() {
            return Err(PortalError::forbidden(format!(
                "{} is not an administrator",
                self.email
            )));
        }
        Ok(())
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, contents).await?;

        debug!("Saved session for {} to {:?}", session.email, self.path);
        Ok(())
    }

    /// `None` when nobody is logged in. A corrupt file counts as logged out.
    pub async fn load(&self) -> Result<Option<Session>> {
        if !fs::try_exists(&self.path).await? {
            debug!("No session file at {:?}", self.path);
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    pub async fn require(&self) -> Result<Session> {
        self.load()
            .await?
            .ok_or_else(|| PortalError::forbidden("not logged in, run `unival login` first"))
    }

    /// Returns whether a session was removed.
    pub async fn clear(&self) -> Result<bool> {
        if !fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        fs::remove_file(&self.path).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session(role: Role) -> Session {
        Session {
            user_id: "u1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@uni.edu".to_string(),
            role,
            department_id: Some("d-cs".to_string()),
            department: "Computer Science".to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_round_trip_and_clear() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().await.unwrap().is_none());
        store.save(&session(Role::Faculty)).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.role, Role::Faculty);
        assert_eq!(loaded.department, "Computer Science");

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
        assert!(store.require().await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_session_is_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::new(path);
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn test_require_admin() {
        assert!(session(Role::Admin).require_admin().is_ok());
        assert!(matches!(
            session(Role::Student).require_admin(),
            Err(PortalError::Forbidden(_))
        ));
    }
}
