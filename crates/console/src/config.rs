//! Runtime configuration read from the environment.

use std::path::PathBuf;

use hbnb_storage::DEFAULT_STORAGE_PATH;

pub const STORAGE_PATH_ENV: &str = "HBNB_STORAGE_PATH";
pub const PROMPT_ENV: &str = "HBNB_PROMPT";
pub const DEFAULT_PROMPT: &str = "(hbnb) ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// JSON document backing the store.
    pub storage_path: PathBuf,
    /// Written before each line when stdin is a terminal.
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or empty values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        match lookup(STORAGE_PATH_ENV).filter(|v| !v.is_empty()) {
            Some(path) => config.storage_path = PathBuf::from(path),
            None => tracing::debug!(
                path = DEFAULT_STORAGE_PATH,
                "{STORAGE_PATH_ENV} unset, using default storage path"
            ),
        }

        if let Some(prompt) = lookup(PROMPT_ENV).filter(|v| !v.is_empty()) {
            config.prompt = prompt;
        }

        config
    }
}
