//! Runtime configuration: environment variables (optionally from `.env`),
//! overlaid by an optional TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::VillaError;

pub const DEFAULT_API_URL: &str = "http://localhost:7001";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7001;
pub const DEFAULT_DB_PATH: &str = "magicvilla.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL the client side sends requests to.
    pub api_url: String,
    /// Bearer token attached to client requests.
    pub token: Option<String>,
    /// Address the server binds.
    pub host: String,
    pub port: u16,
    /// SQLite database file used by the server.
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

/// Keys a TOML config file may set. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    token: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` if present, reads the environment, then applies
    /// `config_file` on top when given.
    pub fn load(config_file: Option<&Path>) -> Result<Self, VillaError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env();
        match config_file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    VillaError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                config.overlay_toml(&text)
            }
            None => Ok(config),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a key lookup. Unparseable ports fall back to the
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_url: lookup("MAGICVILLA_API_URL").unwrap_or(defaults.api_url),
            token: lookup("MAGICVILLA_TOKEN").filter(|t| !t.is_empty()),
            host: lookup("MAGICVILLA_HOST").unwrap_or(defaults.host),
            port: lookup("MAGICVILLA_PORT")
                .and_then(|val| val.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            db_path: lookup("MAGICVILLA_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
        }
    }

    /// Returns a copy with every key present in `text` replaced.
    pub fn overlay_toml(mut self, text: &str) -> Result<Self, VillaError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| VillaError::Config(e.to_string()))?;
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(token) = file.token {
            self.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(db_path) = file.db_path {
            self.db_path = db_path;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
