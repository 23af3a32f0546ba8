//! Path management for budget-goals
//!
//! Only user preferences live on disk; goals are kept in memory.
//!
//! ## Path Resolution Order
//!
//! 1. `GOALS_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/budget-goals` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::GoalError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "GOALS_CONFIG_DIR";

/// Manages all paths used by budget-goals
#[derive(Debug, Clone)]
pub struct GoalPaths {
    base_dir: PathBuf,
}

impl GoalPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, GoalError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create GoalPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), GoalError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| GoalError::Io(format!("Failed to create config directory: {}", e)))
    }
}

fn resolve_default_path() -> Result<PathBuf, GoalError> {
    ProjectDirs::from("", "", "budget-goals")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| GoalError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = GoalPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let paths = GoalPaths::with_base_dir(nested.clone());

        paths.ensure_directories().unwrap();
        assert!(nested.exists());
    }
}
