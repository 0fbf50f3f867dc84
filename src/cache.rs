use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::types::ProjectId;

/// Client state kept between CLI invocations.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Cache {
    #[serde(default)]
    current: Option<ProjectId>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Cache {
    pub fn load() -> Self {
        match Self::cache_path() {
            Ok(path) => Self::load_from(&path),
            Err(_) => Self::default(),
        }
    }

    /// Load the state at `path`; later saves write back to it.
    pub fn load_from(path: &Path) -> Self {
        let mut cache: Self = std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default();

        cache.path = Some(path.to_path_buf());
        cache
    }

    pub fn save(&self) {
        if let Some(path) = &self.path {
            self.save_to(path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let contents = match serde_json::to_string_pretty(self) {
            Ok(c) => c,
            Err(_) => return,
        };

        if let Err(e) = std::fs::write(path, contents) {
            tracing::warn!(path = %path.display(), error = %e, "failed to save client state");
        }
    }

    fn cache_path() -> Result<PathBuf, ()> {
        Config::config_path()
            .map(|p| p.with_file_name("state.json"))
            .map_err(|_| ())
    }

    pub fn current(&self) -> Option<ProjectId> {
        self.current
    }

    pub fn set_current(&mut self, current: Option<ProjectId>) {
        self.current = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_selection_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut cache = Cache::load_from(&path);
        cache.set_current(Some(4));
        cache.save();

        assert_eq!(Cache::load_from(&path).current(), Some(4));
    }

    #[test]
    fn unreadable_state_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert_eq!(Cache::load_from(&path).current(), None);

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Cache::load_from(&path).current(), None);
    }
}
