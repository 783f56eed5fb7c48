//! Configuration loading for relinfo.
//! Reads relinfo.toml from the current directory or the path in RELINFO_CONFIG.
//! Every section is optional; a missing default file yields the defaults.

use std::net::SocketAddr;
use std::path::Path;

use relinfo_common::{ExperimentId, SchemaNamespaces};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{ConfigError, Result};

pub const CONFIG_ENV_VAR: &str = "RELINFO_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "relinfo.toml";

/// Placeholder substituted into `urls.experiment_view`.
pub const EXPERIMENT_ID_PLACEHOLDER: &str = "{experiment_id}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub schemas: SchemaNamespaces,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub urls: UrlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory served under /static, if any.
    pub static_dir: Option<String>,
}

fn default_bind() -> String { "127.0.0.1:3001".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), static_dir: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header set by the fronting proxy to the authenticated username.
    #[serde(default = "default_user_header")]
    pub user_header: String,
    #[serde(default)]
    pub experiments: Vec<ExperimentAcl>,
}

fn default_user_header() -> String { "x-remote-user".to_string() }

impl Default for AuthConfig {
    fn default() -> Self {
        Self { user_header: default_user_header(), experiments: Vec::new() }
    }
}

/// Access control entry for one experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentAcl {
    pub id: ExperimentId,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub readers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file used to seed the in-memory parameter store.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    #[serde(default = "default_experiment_view")]
    pub experiment_view: String,
}

fn default_experiment_view() -> String { "/experiment/view/{experiment_id}/".to_string() }

impl Default for UrlConfig {
    fn default() -> Self {
        Self { experiment_view: default_experiment_view() }
    }
}

impl UrlConfig {
    /// Path of the experiment's own view page.
    pub fn experiment_view_path(&self, experiment_id: ExperimentId) -> String {
        self.experiment_view
            .replace(EXPERIMENT_ID_PLACEHOLDER, &experiment_id.to_string())
    }
}


impl Config {
    /// Load configuration from relinfo.toml.
    /// Checks RELINFO_CONFIG env var first, then current directory.
    /// An explicitly configured path must exist.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not an address: {}", self.server.bind)))
    }

    fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        if !self.urls.experiment_view.contains(EXPERIMENT_ID_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "urls.experiment_view must contain {}",
                EXPERIMENT_ID_PLACEHOLDER
            )));
        }
        if self.auth.user_header.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.user_header is empty".to_string()));
        }
        if http::HeaderName::from_bytes(self.auth.user_header.as_bytes()).is_err() {
            return Err(ConfigError::Invalid(format!(
                "auth.user_header is not a valid header name: {}",
                self.auth.user_header
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for acl in &self.auth.experiments {
            if !seen.insert(acl.id) {
                return Err(ConfigError::Invalid(format!(
                    "experiment {} listed twice in auth.experiments",
                    acl.id
                )));
            }
        }
        Ok(())
    }
}
