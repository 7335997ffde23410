//! Configuration manager for tambouille.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Domain name of current instance.
    pub url: String,
    support: Option<String>,
    favicon: Option<String>,
    terms_of_service: Option<String>,
    privacy_policy: Option<String>,
    #[serde(default)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to JsonWebToken configuration.
    #[serde(skip_serializing)]
    pub token: Option<Token>,
    /// Related to PostgreSQL configuration.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Related to Argon2 configuration.
    #[serde(skip_serializing)]
    pub argon2: Option<Argon2>,
}

/// PostgreSQL configuration.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Postgres {
    /// Hostname:(?port) for PostgreSQL instance.
    pub address: String,
    /// Database name.
    pub database: Option<String>,
    /// Username credential to connect.
    pub username: Option<String>,
    /// Password credential to connect.
    pub password: Option<String>,
    /// Maximum pool connections.
    pub pool_size: Option<u32>,
}

/// Argon2 configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Argon2 {
    /// Memory used while hashing.
    pub memory_cost: u32,
    /// Iterations of hash.
    pub iterations: u32,
    /// Parallelism degree.
    pub parallelism: u32,
    /// Output hash length.
    pub hash_length: usize,
}

impl Default for Argon2 {
    fn default() -> Self {
        Self {
            memory_cost: 1024 * 64, // 64 MiB.
            iterations: 4,
            parallelism: 2,
            hash_length: 32,
        }
    }
}

/// Json Web Token configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Token {
    pub public_key_pem: String,
    pub private_key_pem: String,
    /// Update token audience.
    /// Default is the instance URL.
    pub audience: Option<String>,
}

impl FromRef<AppState> for Arc<Configuration> {
    fn from_ref(state: &AppState) -> Arc<Configuration> {
        Arc::clone(&state.config)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Normalizes a URL string by ensuring it starts with a valid scheme
    /// (`http` or `https`).
    fn normalize_url(&self, url: &str) -> Result<String, url::ParseError> {
        let url_with_scheme =
            if url.starts_with("http://") || url.starts_with("https://") {
                url.to_string()
            } else {
                format!("https://{url}")
            };

        let parsed_url = Url::parse(&url_with_scheme)?;
        Ok(parsed_url.to_string())
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Arc<Self>, url::ParseError> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => {
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Ok(Arc::new(self.error(err)));
                        },
                    };

                // set app version.
                config.version = VERSION.to_owned();

                // normalize URLs.
                config.url = self.normalize_url(&config.url)?;
                config.favicon = config
                    .favicon
                    .map(|f| self.normalize_url(&f))
                    .transpose()?;
                config.terms_of_service = config
                    .terms_of_service
                    .map(|f| self.normalize_url(&f))
                    .transpose()?;
                config.privacy_policy = config
                    .privacy_policy
                    .map(|f| self.normalize_url(&f))
                    .transpose()?;

                Ok(Arc::new(config))
            },
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found");
        Self {
            version: VERSION.to_owned(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_on_missing_file() {
        let config = Configuration::default()
            .path(PathBuf::from("/definitely/not/here.yaml"))
            .read()
            .unwrap();

        assert_eq!(config.version, VERSION);
        assert!(config.postgres.is_none());
    }

    #[test]
    fn test_read_and_normalize() {
        let dir = std::env::temp_dir().join("tambouille-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(
            &path,
            r#"
name: tambouille
url: tambouille.example
postgres:
  address: localhost:5432
  pool_size: 5
"#,
        )
        .unwrap();

        let config =
            Configuration::default().path(path.clone()).read().unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.name, "tambouille");
        assert_eq!(config.url, "https://tambouille.example/");
        assert_eq!(
            config.postgres.as_ref().and_then(|p| p.pool_size),
            Some(5)
        );
    }
}
