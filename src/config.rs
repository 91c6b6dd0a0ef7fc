//! Application-level configuration loading: admin PIN, scan debounce and broadcast sizing.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "AIRSOFT_QR_BACK_CONFIG_PATH";

const DEFAULT_ADMIN_PIN: &str = "0160";
const DEFAULT_SCAN_DEBOUNCE_MS: u64 = 1200;
const DEFAULT_ABORT_HOLD_SECS: u64 = 10;
const DEFAULT_SSE_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// PIN that unlocks the admin surface.
    pub admin_pin: String,
    /// Minimum spacing between two accepted scans.
    pub scan_debounce: Duration,
    /// How long an abort request must be held before it fires.
    pub abort_hold: Duration,
    /// Buffer size of the SSE broadcast channel.
    pub sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        debounce_ms = app_config.scan_debounce.as_millis() as u64,
                        abort_hold_secs = app_config.abort_hold.as_secs(),
                        "loaded match settings from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_pin: DEFAULT_ADMIN_PIN.into(),
            scan_debounce: Duration::from_millis(DEFAULT_SCAN_DEBOUNCE_MS),
            abort_hold: Duration::from_secs(DEFAULT_ABORT_HOLD_SECS),
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    admin_pin: Option<String>,
    scan_debounce_ms: Option<u64>,
    abort_hold_secs: Option<u64>,
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            admin_pin: value
                .admin_pin
                .map(|pin| pin.trim().to_string())
                .filter(|pin| !pin.is_empty())
                .unwrap_or(defaults.admin_pin),
            scan_debounce: value
                .scan_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.scan_debounce),
            abort_hold: value
                .abort_hold_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.abort_hold),
            sse_capacity: value
                .sse_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.sse_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
