use crate::error::{OwnpadError, Result};
use crate::types::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level ownpad configuration stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnpadConfig {
    pub ownpad: OwnpadSettings,
    #[serde(default)]
    pub redis: Option<RedisConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnpadSettings {
    /// Record store backend ("sqlite", "memory" or "redis").
    #[serde(default = "default_record_store")]
    pub record_store: String,
    /// Path to the SQLite record database.
    pub db_path: String,
    /// Category substituted into storage address templates.
    #[serde(default = "default_category")]
    pub category: String,
    /// Storage API tags the remote client accepts. Unset accepts any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_apis: Option<Vec<String>>,
}

/// Connection settings for the redis record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
}

impl RedisConfig {
    /// Connection URL in the form `redis://[:password@]host:port/`.
    pub fn url(&self) -> String {
        match self.password {
            Some(ref pwd) => format!("redis://:{pwd}@{}:{}/", self.host, self.port),
            None => format!("redis://{}:{}/", self.host, self.port),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            password: None,
        }
    }
}

fn default_record_store() -> String {
    "sqlite".to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_redis_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

impl OwnpadConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OwnpadError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| OwnpadError::TomlDe(e.to_string()))
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| OwnpadError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config for `ownpad init`.
    pub fn default_config(base_dir: &Path) -> Self {
        Self {
            ownpad: OwnpadSettings {
                record_store: default_record_store(),
                db_path: base_dir.join("records.db").display().to_string(),
                category: default_category(),
                supported_apis: None,
            },
            redis: None,
        }
    }

    /// Resolve the config file path: `<base_dir>/ownpad.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("ownpad.toml")
    }

    /// Resolve the default ownpad home directory: `~/.ownpad`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".ownpad"))
            .ok_or_else(|| OwnpadError::Config("Cannot determine home directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrip_config() {
        let tmp = TempDir::new().unwrap();
        let path = OwnpadConfig::default_path(tmp.path());
        let config = OwnpadConfig::default_config(tmp.path());
        config.save(&path).unwrap();
        let loaded = OwnpadConfig::load(&path).unwrap();
        assert_eq!(loaded.ownpad.record_store, "sqlite");
        assert_eq!(loaded.ownpad.category, "documents");
        assert!(loaded.redis.is_none());
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let result = OwnpadConfig::load(Path::new("/nonexistent/ownpad.toml"));
        assert!(matches!(result, Err(OwnpadError::ConfigNotFound(_))));
    }

    #[test]
    fn minimal_file_gets_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ownpad.toml");
        std::fs::write(
            &path,
            "[ownpad]\ndb_path = \"/tmp/r.db\"\n\n[redis]\npassword = \"pw\"\n",
        )
        .unwrap();
        let loaded = OwnpadConfig::load(&path).unwrap();
        assert_eq!(loaded.ownpad.record_store, "sqlite");
        assert_eq!(loaded.ownpad.category, "documents");
        assert!(loaded.ownpad.supported_apis.is_none());
        let redis = loaded.redis.unwrap();
        assert_eq!(redis.port, 6379);
        assert_eq!(redis.url(), "redis://:pw@127.0.0.1:6379/");
    }

    #[test]
    fn supported_apis_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = OwnpadConfig::default_path(tmp.path());
        let mut config = OwnpadConfig::default_config(tmp.path());
        config.ownpad.supported_apis = Some(vec!["simple".into(), "CouchDB".into()]);
        config.save(&path).unwrap();
        let loaded = OwnpadConfig::load(&path).unwrap();
        assert_eq!(
            loaded.ownpad.supported_apis,
            Some(vec!["simple".to_string(), "CouchDB".to_string()])
        );
    }

    #[test]
    fn redis_url_without_password() {
        assert_eq!(RedisConfig::default().url(), "redis://127.0.0.1:6379/");
    }
}
