//! Gateway configuration.
//!
//! | Source | Notes |
//! |--------|-------|
//! | defaults | see `GatewayConfig::load_from` |
//! | `PHYSICS_LAB_CONFIG` file, else the caller's default path | extension optional |
//! | `PHYSICS_LAB__*` env | e.g. `PHYSICS_LAB__BIND_ADDR=0.0.0.0:8000` |
//!
//! The upstream API key is not part of the file: it is read from `LOVABLE_API_KEY`
//! by [`GatewayConfig::api_key_from_env`] so it never lands in a checked-in file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_UPSTREAM_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_ROUTE: &str = "/functions/v1/physics-chat";
pub const API_KEY_ENV: &str = "LOVABLE_API_KEY";
pub const CONFIG_PATH_ENV: &str = "PHYSICS_LAB_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the relay listens on.
    pub bind_addr: String,
    /// Path of the chat relay endpoint.
    pub route: String,
    pub upstream_url: String,
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            route: DEFAULT_ROUTE.to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Precedence: `PHYSICS_LAB__*` env > `PHYSICS_LAB_CONFIG` file (or `default_path`) > defaults.
    pub fn load(default_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path(std::env::var(CONFIG_PATH_ENV).ok(), default_path.as_ref());
        tracing::debug!(path = %path.display(), "loading gateway config");
        Self::load_from(path)
    }

    /// Same as [`GatewayConfig::load`] with an explicit file path. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("route", defaults.route)?
            .set_default("upstream_url", defaults.upstream_url)?
            .set_default("model", defaults.model)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("PHYSICS_LAB").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Reads the upstream API key once. Unset or blank => `None`.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// `PHYSICS_LAB_CONFIG` wins when set and non-blank.
fn config_path(from_env: Option<String>, default_path: &Path) -> PathBuf {
    match from_env {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
        _ => default_path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_path_prefers_env_override() {
        let default = Path::new("/srv/gateway/config/gateway");
        assert_eq!(config_path(None, default), default);
        assert_eq!(config_path(Some("  ".to_string()), default), default);
        assert_eq!(
            config_path(Some(" /etc/physics-lab.toml ".to_string()), default),
            PathBuf::from("/etc/physics-lab.toml")
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GatewayConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.route, DEFAULT_ROUTE);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "bind_addr = \"0.0.0.0:9090\"\nroute = \"/chat\"").unwrap();
        drop(file);

        let cfg = GatewayConfig::load_from(&path).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:9090");
        assert_eq!(cfg.route, "/chat");
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }
}
