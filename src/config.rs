//! Loading service configuration from TOML, with environment overrides.
//!
//! ```toml
//! [contest_service]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//! token = "..."          # optional, CONTEST_API_TOKEN wins
//!
//! [defaults]             # any subset of ProblemDefaults
//! points = 100
//! memory_limit_kb = 128
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::seeds::ProblemDefaults;

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AuthorConfig {
    #[serde(default)]
    pub contest_service: ContestServiceConfig,
    #[serde(default)]
    pub defaults: ProblemDefaults,
}

/// Where the Contest Service lives and how to reach it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContestServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

impl Default for ContestServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_secs: 30,
            token: None,
        }
    }
}

impl AuthorConfig {
    /// Apply environment overrides on top of the file values.
    pub fn with_env_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("CONTEST_API_BASE_URL").filter(|s| !s.is_empty()) {
            self.contest_service.base_url = url;
        }
        if let Some(token) = var("CONTEST_API_TOKEN") {
            self.contest_service.token = Some(token);
        }
        self
    }
}

/// Attempt to load `AuthorConfig` from AUTHOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_author_config_from_env() -> Option<AuthorConfig> {
    let path = std::env::var("AUTHOR_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<AuthorConfig>(&s) {
            Ok(cfg) => {
                info!(target: "problemset_author", %path, "Loaded author config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(target: "problemset_author", %path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(target: "problemset_author", %path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}

/// File config (or defaults) plus process environment.
pub fn load_config() -> AuthorConfig {
    load_author_config_from_env()
        .unwrap_or_default()
        .with_env_overrides(|k| std::env::var(k).ok())
}
