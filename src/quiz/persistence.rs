use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use crate::quiz::result::TestResult;
use crate::store::json_store::JsonStore;
use crate::store::schema::{Document, RemoteAttempt, attempts_collection};

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub uid: String,
    /// Bearer credential for remote stores that need one.
    pub id_token: Option<String>,
}

pub trait AuthProvider: Send {
    fn current_user(&self) -> Option<Principal>;
}

/// Write-only view of a remote document database.
pub trait DocumentStore: Send {
    /// Add a new document to `collection`, returning its id.
    fn add_document(
        &self,
        principal: &Principal,
        collection: &str,
        document: &Document,
    ) -> Result<String>;
}

/// Signed-in user taken from configuration or the command line.
#[derive(Clone, Debug, Default)]
pub struct ConfiguredAuth {
    principal: Option<Principal>,
}

impl ConfiguredAuth {
    pub fn new(user_id: Option<String>, id_token: Option<String>) -> Self {
        let principal = user_id
            .filter(|uid| !uid.trim().is_empty())
            .map(|uid| Principal { uid, id_token });
        Self { principal }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl AuthProvider for ConfiguredAuth {
    fn current_user(&self) -> Option<Principal> {
        self.principal.clone()
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("User not logged in")]
    Unauthenticated,
    #[error("could not save result: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// The two independent destinations of a finished test.
pub struct ResultPersistence {
    auth: Box<dyn AuthProvider>,
    documents: Box<dyn DocumentStore>,
    local: JsonStore,
}

impl ResultPersistence {
    pub fn new(
        auth: Box<dyn AuthProvider>,
        documents: Box<dyn DocumentStore>,
        local: JsonStore,
    ) -> Self {
        Self {
            auth,
            documents,
            local,
        }
    }

    pub fn current_user(&self) -> Option<Principal> {
        self.auth.current_user()
    }

    /// Append the attempt to the signed-in user's history.
    pub fn save_remote(&self, result: &TestResult) -> Result<String, PersistError> {
        let principal = self.auth.current_user().ok_or(PersistError::Unauthenticated)?;
        let attempt = RemoteAttempt::from_result(result, Utc::now());
        let collection = attempts_collection(&principal.uid);
        let id = self
            .documents
            .add_document(&principal, &collection, &attempt.to_document())?;
        info!("saved attempt {id} for {}", principal.uid);
        Ok(id)
    }

    /// Replace the locally remembered result. Works signed in or not.
    pub fn save_local(&self, result: &TestResult) -> Result<()> {
        self.local.save_last_result(result).inspect_err(|e| {
            warn!("could not write local result: {e:#}");
        })
    }

    pub fn last_local(&self) -> Option<TestResult> {
        self.local.load_last_result()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;
    use tempfile::TempDir;

    use super::*;

    type Written = Arc<Mutex<Vec<(String, String, Document)>>>;

    struct RecordingStore {
        written: Written,
        fail: bool,
    }

    impl DocumentStore for RecordingStore {
        fn add_document(
            &self,
            principal: &Principal,
            collection: &str,
            document: &Document,
        ) -> Result<String> {
            if self.fail {
                return Err(anyhow!("backend down"));
            }
            let mut written = self.written.lock().unwrap();
            written.push((principal.uid.clone(), collection.to_string(), document.clone()));
            Ok(format!("doc-{}", written.len()))
        }
    }

    fn persistence(auth: ConfiguredAuth, fail: bool) -> (TempDir, Written, ResultPersistence) {
        let dir = TempDir::new().unwrap();
        let written: Written = Arc::default();
        let store = RecordingStore {
            written: Arc::clone(&written),
            fail,
        };
        let local = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let p = ResultPersistence::new(Box::new(auth), Box::new(store), local);
        (dir, written, p)
    }

    #[test]
    fn remote_write_requires_a_user() {
        let (_dir, written, p) = persistence(ConfiguredAuth::signed_out(), false);
        let err = p.save_remote(&TestResult::new(10, 5)).unwrap_err();
        assert!(matches!(err, PersistError::Unauthenticated));
        assert_eq!(err.to_string(), "User not logged in");
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn remote_write_goes_to_user_collection() {
        let auth = ConfiguredAuth::new(Some("u-7".to_string()), None);
        let (_dir, written, p) = persistence(auth, false);
        let id = p.save_remote(&TestResult::new(10, 5)).unwrap();
        assert_eq!(id, "doc-1");
        let written = written.lock().unwrap();
        assert_eq!(written[0].0, "u-7");
        assert_eq!(written[0].1, "users/u-7/attempts");
        assert_eq!(written[0].2.len(), 3);
    }

    #[test]
    fn store_failure_is_reported() {
        let auth = ConfiguredAuth::new(Some("u-7".to_string()), None);
        let (_dir, _written, p) = persistence(auth, true);
        let err = p.save_remote(&TestResult::new(1, 1)).unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }

    #[test]
    fn local_write_does_not_need_auth() {
        let (_dir, _written, p) = persistence(ConfiguredAuth::signed_out(), false);
        p.save_local(&TestResult::new(10, 3)).unwrap();
        assert_eq!(p.last_local().unwrap().attempted, 3);
    }

    #[test]
    fn blank_user_id_is_signed_out() {
        let auth = ConfiguredAuth::new(Some("  ".to_string()), Some("tok".to_string()));
        assert!(auth.current_user().is_none());
    }
}
