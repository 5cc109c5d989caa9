use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "RAWHTTPD_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

/// Where static content lives and how it is typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory served for any path that no route claims.
    pub root: PathBuf,
    /// File served for a request to `/`.
    pub default_file: String,
    /// Extension (without the dot) to content type, layered over the built-in table.
    pub mime_types: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticFilesConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            default_file: "index.html".to_string(),
            mime_types: HashMap::new(),
        }
    }
}

impl Config {
    /// Loads the config file named by `RAWHTTPD_CONFIG` (defaults when unset),
    /// then applies the `LISTEN` and `STATIC_ROOT` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("STATIC_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }

        cfg.static_files.root = absolute_root(&cfg.static_files.root)?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// The configured log level, falling back to `INFO` for unknown names.
    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

// The containment check compares string prefixes, so the root must be absolute.
fn absolute_root(root: &Path) -> anyhow::Result<PathBuf> {
    std::path::absolute(root)
        .with_context(|| format!("cannot resolve static root {}", root.display()))
}
