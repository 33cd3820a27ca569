//! Unified path management for postcraft files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/postcraft/          # Config directory
//! └── config.toml               # Webhook endpoints and settings
//!
//! ~/.cache/postcraft/           # Cache directory
//! └── session.json              # Last generated content (single slot)
//!
//! ~/.local/share/postcraft/     # Data directory
//! └── logs/
//!     └── postcraft.log.YYYY-MM-DD
//! ```

use postcraft_core::error::{PostcraftError, Result};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "postcraft";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcraftPaths {
    config_dir: PathBuf,
    cache_dir: PathBuf,
    data_dir: PathBuf,
}

impl PostcraftPaths {
    /// Resolves the platform directories (XDG on Linux).
    pub fn resolve() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PostcraftError::config("Cannot find config directory"))?;
        let cache_dir = dirs::cache_dir().unwrap_or_else(|| config_dir.clone());
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| config_dir.clone());

        Ok(Self {
            config_dir: config_dir.join(APP_NAME),
            cache_dir: cache_dir.join(APP_NAME),
            data_dir: data_dir.join(APP_NAME),
        })
    }

    /// Places every directory under `root`. Used by tests and portable setups.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_cache_file(&self) -> PathBuf {
        self.cache_dir.join("session.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_root() {
        let paths = PostcraftPaths::under("/tmp/pc");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/pc/config/config.toml"));
        assert_eq!(
            paths.session_cache_file(),
            PathBuf::from("/tmp/pc/cache/session.json")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/pc/data/logs"));
    }

    #[test]
    fn test_resolved_dirs_are_namespaced() {
        if let Ok(paths) = PostcraftPaths::resolve() {
            assert!(paths.config_dir().ends_with("postcraft"));
            assert!(paths.config_file().starts_with(paths.config_dir()));
            assert!(paths.logs_dir().ends_with("logs"));
        }
    }
}
