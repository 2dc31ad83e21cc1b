use serde::Deserialize;
use viewcounter_core::error::{Result, ViewCounterError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    pub backend: BackendConfig,
}

impl CounterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ViewCounterError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;   // Verify the scope of value
        self.backend.validate()?;

        Ok(())
    }
}

/// Which route table the router exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Full API: view, views, export, import, health.
    #[default]
    Full,
    /// Only `/view/:slug`, like a serverless single-function deployment.
    /// Wrong methods answer 405 instead of 404.
    Single,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub routes: RouteMode,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            request_timeout_ms: default_request_timeout_ms(),
            routes: RouteMode::default(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ViewCounterError::Config(format!(
                "server.listen must be a valid SocketAddr (got {})",
                self.listen
            )));
        }
        if !(100..=120000).contains(&self.request_timeout_ms) {
            return Err(ViewCounterError::Config(
                "server.request_timeout_ms must be between 100 and 120000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8787".into()
}
fn default_request_timeout_ms() -> u64 {
    10000
}

/// Active storage backend. Exactly one per process.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum BackendConfig {
    Memory,
    CloudflareKv {
        account_id: String,
        namespace_id: String,
        #[serde(default = "default_cf_token_env")]
        api_token_env: String,
        #[serde(default = "default_cf_api_base")]
        api_base: String,
        #[serde(default = "default_backend_timeout_ms")]
        timeout_ms: u64,
    },
    Redis {
        url: String,
        #[serde(default = "default_key_prefix")]
        key_prefix: String,
    },
    Postgrest {
        url: String,
        #[serde(default = "default_postgrest_key_env")]
        api_key_env: String,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_increment_fn")]
        increment_fn: String,
        #[serde(default = "default_backend_timeout_ms")]
        timeout_ms: u64,
    },
}

impl BackendConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            BackendConfig::Memory => Ok(()),
            BackendConfig::CloudflareKv { account_id, namespace_id, api_base, timeout_ms, .. } => {
                require_non_empty("backend.account_id", account_id)?;
                require_non_empty("backend.namespace_id", namespace_id)?;
                require_http_url("backend.api_base", api_base)?;
                require_timeout(*timeout_ms)
            }
            BackendConfig::Redis { url, key_prefix } => {
                if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
                    return Err(ViewCounterError::Config(
                        "backend.url must start with redis:// or rediss://".into(),
                    ));
                }
                require_non_empty("backend.key_prefix", key_prefix)
            }
            BackendConfig::Postgrest { url, table, increment_fn, timeout_ms, .. } => {
                require_http_url("backend.url", url)?;
                require_non_empty("backend.table", table)?;
                require_non_empty("backend.increment_fn", increment_fn)?;
                require_timeout(*timeout_ms)
            }
        }
    }
}

fn require_non_empty(field: &str, v: &str) -> Result<()> {
    if v.trim().is_empty() {
        return Err(ViewCounterError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_http_url(field: &str, v: &str) -> Result<()> {
    if !(v.starts_with("http://") || v.starts_with("https://")) {
        return Err(ViewCounterError::Config(format!("{field} must be an http(s) URL")));
    }
    Ok(())
}

fn require_timeout(ms: u64) -> Result<()> {
    if !(100..=60000).contains(&ms) {
        return Err(ViewCounterError::Config(
            "backend.timeout_ms must be between 100 and 60000".into(),
        ));
    }
    Ok(())
}

fn default_cf_token_env() -> String {
    "CF_API_TOKEN".into()
}
fn default_cf_api_base() -> String {
    "https://api.cloudflare.com/client/v4".into()
}
fn default_postgrest_key_env() -> String {
    "SUPABASE_ANON_KEY".into()
}
fn default_table() -> String {
    "view_counts".into()
}
fn default_increment_fn() -> String {
    "increment_view".into()
}
fn default_key_prefix() -> String {
    "views:".into()
}
fn default_backend_timeout_ms() -> u64 {
    5000
}
