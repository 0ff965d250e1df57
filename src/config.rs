//! TOML configuration for loginsentry.
//!
//! Every section is optional; anything left out falls back to the
//! compiled-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::alerts::metrics::DEFAULT_TOTAL_LOGINS_BASELINE;
use crate::generator::DEFAULT_PERIOD;

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "LOGINSENTRY_CONFIG";

const SYSTEM_CONFIG_PATH: &str = "/etc/loginsentry/loginsentry.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentryConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SentryConfig {
    /// Load and validate configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try, in order: the `LOGINSENTRY_CONFIG` path, the system location,
    /// then compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "{} set but file could not be loaded, trying fallback",
                        CONFIG_ENV
                    );
                }
            }
        }

        let system_path = Path::new(SYSTEM_CONFIG_PATH);
        if system_path.exists() {
            match Self::load(system_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %system_path.display(),
                        error = %e,
                        "system config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }

    /// An explicit path must load; otherwise use [`Self::load_or_default`].
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::load_or_default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.generator.interval_ms == 0 {
            bail!("generator.interval_ms must be greater than zero");
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            bail!("server.bind is not a socket address: {}", self.server.bind);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port for the HTTP listener.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Whether synthetic alerts are produced while serving.
    pub enabled: bool,
    /// Milliseconds between generated alerts.
    pub interval_ms: u64,
}

impl GeneratorConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_PERIOD.as_millis() as u64,
        }
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// JSON file replacing the embedded seed alerts.
    pub seed_path: Option<PathBuf>,
    /// Total-logins figure before any generated alert.
    pub total_logins_baseline: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            total_logins_baseline: DEFAULT_TOTAL_LOGINS_BASELINE,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = SentryConfig::default();

        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        assert!(cfg.generator.enabled);
        assert_eq!(cfg.generator.interval_ms, 5_000);
        assert_eq!(cfg.generator.period(), Duration::from_secs(5));
        assert!(cfg.feed.seed_path.is_none());
        assert_eq!(cfg.feed.total_logins_baseline, 53_201);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"

[generator]
enabled = false
interval_ms = 250

[feed]
seed_path = "/opt/loginsentry/seed.json"
total_logins_baseline = 10

[logging]
level = "debug"
json = true
"#;

        let cfg: SentryConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(cfg.server.bind, "0.0.0.0:9000");
        assert!(!cfg.generator.enabled);
        assert_eq!(cfg.generator.period(), Duration::from_millis(250));
        assert_eq!(
            cfg.feed.seed_path,
            Some(PathBuf::from("/opt/loginsentry/seed.json"))
        );
        assert_eq!(cfg.feed.total_logins_baseline, 10);
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: SentryConfig = toml::from_str("[generator]\ninterval_ms = 1000\n").unwrap();

        assert_eq!(cfg.generator.interval_ms, 1_000);
        assert!(cfg.generator.enabled);
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        assert_eq!(cfg.feed.total_logins_baseline, 53_201);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("loginsentry.toml");
        std::fs::write(&path, "[generator]\ninterval_ms = 0\n").unwrap();

        assert!(SentryConfig::load(&path).is_err());
    }

    #[test]
    fn test_bad_bind_rejected() {
        let mut cfg = SentryConfig::default();
        cfg.server.bind = "localhost".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("loginsentry.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9999\"\n").unwrap();

        let cfg = SentryConfig::resolve(Some(&path)).unwrap();
        assert_eq!(cfg.server.bind, "127.0.0.1:9999");
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = SentryConfig::resolve(Some(Path::new("/nonexistent/loginsentry.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cfg = SentryConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let back: SentryConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(back.server.bind, cfg.server.bind);
        assert_eq!(back.generator.interval_ms, cfg.generator.interval_ms);
    }
}
