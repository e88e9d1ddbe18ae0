//! File-backed session store for the terminal client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{SessionResult, SessionStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
}

/// Keeps the token in a small JSON document (`{"token": "..."}`)
#[derive(Debug, Clone)]
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

    fn load(&self) -> SessionResult<SessionFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self) -> Option<String> {
        match self.load() {
            Ok(file) => file.token,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read session file");
                None
            }
        }
    }

    fn write(&self, token: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&SessionFile {
            token: Some(token.to_string()),
        })?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = ?self.path, "Session saved");
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.token().is_none());

        store.write("abc.def.ghi").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.def.ghi"));

        // A second handle on the same path sees the token
        let other = FileSessionStore::new(store.path());
        assert!(other.is_authenticated());

        store.clear().unwrap();
        assert!(!other.is_authenticated());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.read().is_none());

        store.write("t").unwrap();
        assert_eq!(store.token().as_deref(), Some("t"));
    }
}
