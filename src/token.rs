use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

const TOKEN_ENV: &str = "PROJECTS_TOKEN";

/// Read access to the persisted bearer token.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Token kept in a file beside the config, overridable through `PROJECTS_TOKEN`.
pub struct FileTokenStore {
    path: PathBuf,
    use_env: bool,
}

impl FileTokenStore {
    /// Token file in the default config directory.
    pub fn open() -> Result<Self> {
        let path = Config::config_path()?.with_file_name("token");
        Ok(Self {
            path,
            use_env: true,
        })
    }

    /// Token file at an explicit path, ignoring the environment.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            use_env: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{}\n", token.trim()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_file(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        non_empty(&contents)
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        if self.use_env {
            if let Some(token) = std::env::var(TOKEN_ENV).ok().and_then(|t| non_empty(&t)) {
                return Some(token);
            }
        }
        self.read_file()
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("token"));
        assert_eq!(store.token(), None);
    }

    #[test]
    fn save_then_read_trims() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("nested").join("token"));

        store.save("  abc.def  ").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.def"));
    }

    #[test]
    fn blank_file_counts_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::at(path).token(), None);
    }

    #[test]
    fn clear_removes_token_and_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::at(dir.path().join("token"));

        store.save("secret").unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
        store.clear().unwrap();
    }
}
