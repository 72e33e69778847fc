//! Process-wide configuration, read once at startup and passed down explicitly.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3300";
pub const DEFAULT_FONT_DIR: &str = "fonts";
pub const DEFAULT_FONT: &str = "arial";
pub const DEFAULT_PRESIGN_TTL: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub overlay: OverlayConfig,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub font_dir: PathBuf,
    pub default_font: String,
    pub work_dir: PathBuf,
    pub presign_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            font_dir: PathBuf::from(DEFAULT_FONT_DIR),
            default_font: DEFAULT_FONT.to_string(),
            work_dir: env::temp_dir(),
            presign_ttl: DEFAULT_PRESIGN_TTL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let defaults = OverlayConfig::default();
        let presign_ttl = match var("PRESIGN_TTL_SECS") {
            None => defaults.presign_ttl,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "PRESIGN_TTL_SECS",
                    value: raw.clone(),
                    reason: "expected a positive number of seconds".to_string(),
                })?,
        };

        let overlay = OverlayConfig {
            font_dir: var("FONT_DIR").map(PathBuf::from).unwrap_or(defaults.font_dir),
            default_font: var("DEFAULT_FONT").unwrap_or(defaults.default_font),
            work_dir: var("WORK_DIR").map(PathBuf::from).unwrap_or(defaults.work_dir),
            presign_ttl,
        };

        let storage = var("BUCKET_NAME").map(|bucket| StorageConfig {
            bucket,
            region: var("AWS_REGION"),
            endpoint: var("S3_ENDPOINT"),
        });

        Ok(AppConfig {
            bind_addr,
            overlay,
            storage,
        })
    }
}
