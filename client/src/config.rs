use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const GEOCODING_TOKEN_ENV: &str = "MAPBOX_TOKEN";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Authentication and saved-location service, e.g. `https://host/api`.
    pub api_base_url: String,
    pub fire_data_base_url: String,
    pub geocoding_base_url: String,
    pub geocoding_token: Option<String>,
    /// Where the session token and checklist are kept. In memory when unset.
    pub storage_path: Option<PathBuf>,
    pub bridge_address: SocketAddr,
    /// Seconds between fire refreshes while serving; zero disables polling.
    pub refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://fireflight-lambda.herokuapp.com/api".into(),
            fire_data_base_url: "https://wildfirewatch.herokuapp.com".into(),
            geocoding_base_url: "https://api.mapbox.com".into(),
            geocoding_token: None,
            storage_path: Some(PathBuf::from(".fireflight/storage.json")),
            bridge_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
            refresh_secs: 300,
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading config {}", path_ref.display()))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Fills settings that may come from the environment.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(GEOCODING_TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.geocoding_token = Some(token);
        }
        self
    }

    pub fn with_storage_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.storage_path = path;
        }
        self
    }

    pub fn geocoding_token(&self) -> &str {
        self.geocoding_token.as_deref().unwrap_or_default()
    }
}
