//! Persisted session cookies
//!
//! The API authenticates with a session cookie. A browser keeps that
//! cookie in its own jar; here it is written to a small file under the
//! data directory so the session survives between invocations. The file
//! holds one `name=value` pair per line.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;

/// On-disk store for the session cookies
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the configured session file
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.session_path(),
        }
    }

    /// Create a store backed by a specific file
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the saved cookie pairs, empty when no session exists
    pub fn load(&self) -> Vec<String> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    /// Replace the saved session with the given cookie pairs
    pub fn save(&self, cookies: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {:?}", parent))?;
        }

        let content = cookies.join("\n");
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {:?}", self.path))?;
        Ok(())
    }

    /// Remove the saved session (logout)
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove session file: {:?}", self.path))
            }
        }
    }

    /// Whether a saved session exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
