use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivePlan, LoginDetails};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub profile: LoginDetails,
    #[serde(default)]
    pub active_plan: Option<ActivePlan>,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    /// Build session data from a login/sign-up result, which carries the token.
    pub fn from_login(profile: LoginDetails) -> Self {
        Self {
            token: profile.token.clone(),
            profile,
            active_plan: None,
            created_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.created_at).num_minutes().max(0)
    }
}

/// Holder of the single client-side session credential.
///
/// Shared as `Arc<Session>` between the API client, which reads the token on
/// every request and clears it on 401, and the application, which fills it
/// on login.
pub struct Session {
    path: Option<PathBuf>,
    data: RwLock<Option<SessionData>>,
}

impl Session {
    /// Session persisted to `session.json` under `cache_dir`
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: Some(cache_dir.join(SESSION_FILE)),
            data: RwLock::new(None),
        }
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(None),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionData>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SessionData>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load session from disk. Returns whether a session was found.
    pub fn load(&self) -> Result<bool> {
        let Some(path) = self.path.as_ref() else {
            return Ok(self.is_authenticated());
        };
        if !path.exists() {
            return Ok(false);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        *self.write() = Some(data);
        Ok(true)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let contents = match self.read().as_ref() {
            Some(data) => serde_json::to_string_pretty(data)?,
            None => return Ok(()),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        std::fs::write(path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Replace the current session. Only one credential is ever held.
    pub fn update(&self, data: SessionData) {
        *self.write() = Some(data);
    }

    /// Remove the in-memory session and its persisted file.
    ///
    /// Clearing an already empty session succeeds without doing anything.
    pub fn clear(&self) -> Result<()> {
        self.write().take();
        if let Some(path) = self.path.as_ref() {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(anyhow::Error::new(e).context("Failed to remove session file"))
                }
            }
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|d| d.token.clone())
    }

    pub fn data(&self) -> Option<SessionData> {
        self.read().clone()
    }

    pub fn profile(&self) -> Option<LoginDetails> {
        self.read().as_ref().map(|d| d.profile.clone())
    }

    /// Replace the stored profile, keeping the credential.
    pub fn set_profile(&self, profile: LoginDetails) {
        if let Some(data) = self.write().as_mut() {
            data.profile = profile;
        }
    }

    pub fn active_plan(&self) -> Option<ActivePlan> {
        self.read().as_ref().and_then(|d| d.active_plan.clone())
    }

    pub fn set_active_plan(&self, plan: Option<ActivePlan>) {
        if let Some(data) = self.write().as_mut() {
            data.active_plan = plan;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(token: &str) -> SessionData {
        SessionData::from_login(LoginDetails {
            id: "u1".into(),
            email: "ada@example.com".into(),
            token: token.into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_absent_session_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        assert!(!session.load().unwrap());
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        session.update(sample("abc123"));
        session.save().unwrap();

        let reloaded = Session::new(dir.path().to_path_buf());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.token().as_deref(), Some("abc123"));
        assert_eq!(reloaded.profile().unwrap().email, "ada@example.com");
    }

    #[test]
    fn test_update_replaces_credential() {
        let session = Session::in_memory();
        session.update(sample("first"));
        session.update(sample("second"));
        assert_eq!(session.token().as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(dir.path().to_path_buf());
        session.update(sample("abc123"));
        session.save().unwrap();
        let path = session.path().unwrap().to_path_buf();
        assert!(path.exists());

        session.clear().unwrap();
        session.clear().unwrap();
        assert!(!path.exists());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_corrupt_session_file_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        let session = Session::new(dir.path().to_path_buf());
        let err = session.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse session file"));
    }

    #[test]
    fn test_active_plan_requires_session() {
        let session = Session::in_memory();
        session.set_active_plan(Some(ActivePlan::default()));
        assert_eq!(session.active_plan(), None);

        session.update(sample("t"));
        let plan = ActivePlan {
            id: "pro".into(),
            ..Default::default()
        };
        session.set_active_plan(Some(plan.clone()));
        assert_eq!(session.active_plan(), Some(plan));
    }
}
