use crate::components::date_input::DateEntryMode;
use crate::model::Session;
use crate::services::{MemoryStore, RecordStore, RestStore};
use crate::theme::ThemeName;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Where records are read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    /// Hosted database reached over its REST interface
    Rest { url: String, api_key: String },
    /// JSON snapshot file, for offline use
    File { path: String },
}

impl Backend {
    /// Build the record store for this backend
    pub fn connect(&self, session: Option<&Session>) -> anyhow::Result<Arc<dyn RecordStore>> {
        let store: Arc<dyn RecordStore> = match self {
            Backend::Rest { url, api_key } => Arc::new(RestStore::new(
                url,
                api_key,
                session.and_then(|s| s.access_token.clone()),
            )?),
            Backend::File { path } => Arc::new(MemoryStore::from_file(path)?),
        };
        Ok(store)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: Backend,
    /// Signed-in user; `None` after sign-out
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub show_sidebar: bool,
    /// Overrides the date entry style detected from the terminal
    #[serde(default)]
    pub date_entry: Option<DateEntryMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::File {
                path: String::new(),
            },
            session: None,
            theme: ThemeName::default(),
            show_sidebar: false,
            date_entry: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".bizdash"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_rest_backend_with_defaults() {
        let json = r#"{
            "backend": {"kind": "rest", "url": "https://db.example.com", "api_key": "anon"},
            "session": {"user_id": "u1", "email": "jane@example.com"}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.backend,
            Backend::Rest {
                url: "https://db.example.com".to_string(),
                api_key: "anon".to_string(),
            }
        );
        assert_eq!(config.session.unwrap().user_id, "u1");
        assert_eq!(config.theme, ThemeName::Dark);
        assert!(!config.show_sidebar);
        assert!(config.date_entry.is_none());
    }

    #[test]
    fn test_config_parses_file_backend_and_overrides() {
        let json = r#"{
            "backend": {"kind": "file", "path": "/tmp/records.json"},
            "theme": "light",
            "show_sidebar": true,
            "date_entry": "text"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(matches!(config.backend, Backend::File { .. }));
        assert_eq!(config.theme, ThemeName::Light);
        assert!(config.show_sidebar);
        assert_eq!(config.date_entry, Some(DateEntryMode::Text));
        assert!(config.session.is_none());
    }

    #[test]
    fn test_file_backend_connects_to_snapshot() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{}").unwrap();
        let backend = Backend::File {
            path: file.path().to_string_lossy().to_string(),
        };

        let store = backend.connect(None).unwrap();
        assert!(store.projects("u1").unwrap().is_empty());
    }
}
