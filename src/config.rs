//! Configuration manager for the accounts service.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::FromRef;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::AppState;
use crate::account::{CreateAccountValidator, DEFAULT_MAX_NAME_LENGTH};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_NAME: &str = "accounts";
const DEFAULT_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 1111;
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors that may occur while turning the configuration into services.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("URL is invalid: {0}")]
    Url(#[from] url::ParseError),
    #[error("`validation.name_pattern` is not a valid regex: {0}")]
    Pattern(#[from] regex_lite::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Instance name.
    pub name: String,
    /// Public URL of current instance.
    pub url: String,
    /// Listening address.
    pub address: String,
    /// Listening port.
    pub port: u16,
    #[serde(skip_deserializing)]
    version: String,
    #[serde(skip)]
    path: PathBuf,
    /// Related to logs output.
    #[serde(skip_serializing)]
    pub log: Log,
    /// Related to PostgreSQL configuration.
    /// The in-memory store is used when missing.
    #[serde(skip_serializing)]
    pub postgres: Option<Postgres>,
    /// Rules applied on account creation requests.
    #[serde(skip_serializing)]
    pub validation: Validation,
    /// Create account workflow behaviour.
    #[serde(skip_serializing)]
    pub workflow: Workflow,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_owned(),
            url: String::default(),
            address: DEFAULT_ADDRESS.to_owned(),
            port: DEFAULT_PORT,
            version: VERSION.to_owned(),
            path: PathBuf::default(),
            log: Log::default(),
            postgres: None,
            validation: Validation::default(),
            workflow: Workflow::default(),
        }
    }
}

/// Logs configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Output logs as JSON lines.
    pub json: bool,
    /// Default filter, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            json: false,
            level: "info".into(),
        }
    }
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

/// Validation rules configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    /// Maximum name length, in characters.
    pub max_name_length: usize,
    /// Pattern the trimmed name must match.
    pub name_pattern: Option<String>,
}

impl Default for Validation {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            name_pattern: None,
        }
    }
}

impl Validation {
    /// Build the request validator, compiling `name_pattern`.
    pub fn validator(&self) -> Result<CreateAccountValidator, ConfigError> {
        let pattern = self
            .name_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        Ok(CreateAccountValidator::new(self.max_name_length, pattern))
    }
}

/// Workflow configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    /// Reject invalid requests before anything is persisted.
    /// When disabled, failures are only logged.
    pub enforce_validation: bool,
    /// Dispatch a "list accounts" query after each creation.
    pub list_after_create: bool,
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            enforce_validation: true,
            list_after_create: false,
        }
    }
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

    /// Service version.
    pub fn version(&self) -> &str {
        &self.version
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
    pub fn read(self) -> Result<Arc<Self>, ConfigError> {
        let file_path = self.file_path();

        match File::open(&file_path) {
            Ok(file) => {
                let mut config: Configuration =
                    match serde_yaml::from_reader(file) {
                        Ok(config) => config,
                        Err(err) => {
                            return Ok(Arc::new(self.error(err)));
                        },
                    };

                config.version = VERSION.to_owned();
                config.path = file_path;
                if !config.url.is_empty() {
                    config.url = self.normalize_url(&config.url)?;
                }

                // fail early on a broken pattern.
                config.validation.validator()?;

                Ok(Arc::new(config))
            },
            Err(err) => Ok(Arc::new(self.error(err))),
        }
    }

    /// Requested path when it is a file, `config.yaml` otherwise.
    fn file_path(&self) -> PathBuf {
        if self.path.is_file() {
            return self.path.clone();
        }

        if !self.path.as_os_str().is_empty() {
            tracing::warn!(
                path = %self.path.display(),
                fallback = DEFAULT_CONFIG_PATH,
                "configuration file not found, trying default location"
            );
        }
        Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, path = %self.path.display(), "cannot load configuration file, using defaults");
        Self {
            path: self.path.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Configuration = serde_yaml::from_str(
            r#"
name: test
workflow:
  list_after_create: true
"#,
        )
        .unwrap();

        assert_eq!(config.name, "test");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.postgres.is_none());
        assert!(config.workflow.enforce_validation);
        assert!(config.workflow.list_after_create);
        assert_eq!(config.validation.max_name_length, DEFAULT_MAX_NAME_LENGTH);
    }

    #[test]
    fn test_normalize_url() {
        let config = Configuration::default();

        assert_eq!(
            config.normalize_url("accounts.example.com").unwrap(),
            "https://accounts.example.com/"
        );
        assert_eq!(
            config.normalize_url("http://localhost:1111").unwrap(),
            "http://localhost:1111/"
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let validation = Validation {
            name_pattern: Some("[unclosed".into()),
            ..Default::default()
        };

        assert!(matches!(validation.validator(), Err(ConfigError::Pattern(_))));
    }

    #[test]
    fn test_read_falls_back_to_repository_file() {
        let config = Configuration::default()
            .path("does-not-exist.yaml".into())
            .read()
            .unwrap();

        assert_eq!(config.version(), VERSION);
        assert_eq!(config.name, DEFAULT_NAME);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_of<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (result, logs)
    }

    #[test]
    fn test_missing_config_path_warns() {
        let config = Configuration::default().path("does-not-exist.yaml".into());

        let (path, logs) = logs_of(|| config.file_path());

        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("does-not-exist.yaml"));
    }

    #[test]
    fn test_default_config_path_is_silent() {
        let (path, logs) = logs_of(|| Configuration::default().file_path());

        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(logs.is_empty());
    }
}
