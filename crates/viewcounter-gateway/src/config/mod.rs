//! Counter config loader (strict parsing).

pub mod schema;

use std::fs;

use viewcounter_core::error::{Result, ViewCounterError};

pub use schema::{BackendConfig, CounterConfig, RouteMode, ServerSection};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "VIEWCOUNTER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "viewcounter.yaml";

/// Config path from `VIEWCOUNTER_CONFIG`, falling back to `viewcounter.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
}

pub fn load_from_file(path: &str) -> Result<CounterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ViewCounterError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CounterConfig> {
    let cfg: CounterConfig = serde_yaml::from_str(s)
        .map_err(|e| ViewCounterError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
