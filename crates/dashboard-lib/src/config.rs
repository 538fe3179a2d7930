//! Dashboard configuration
//!
//! Read once from the environment at startup:
//!
//! | Variable       | Default                              |
//! |----------------|--------------------------------------|
//! | `NODE_NAMES`   | `k8s-node-1,k8s-node-2,k8s-node-3`   |
//! | `POD_NAMES`    | `nginx,redis,postgres,web,api`       |
//! | `CORS_ORIGINS` | `*`                                  |
//! | `PORT`         | `5000`                               |
//! | `METRICS_PORT` | `9100`                               |
//! | `RNG_SEED`     | unset (entropy)                      |

use axum::http::HeaderValue;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ConfigError;

/// Settings as they appear in the environment
#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    #[serde(default = "default_node_names")]
    node_names: String,

    #[serde(default = "default_pod_names")]
    pod_names: String,

    #[serde(default = "default_cors_origins")]
    cors_origins: String,

    #[serde(default = "default_port")]
    port: u16,

    #[serde(default = "default_metrics_port")]
    metrics_port: u16,

    #[serde(default)]
    rng_seed: Option<u64>,
}

fn default_node_names() -> String {
    "k8s-node-1,k8s-node-2,k8s-node-3".to_string()
}

fn default_pod_names() -> String {
    "nginx,redis,postgres,web,api".to_string()
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_metrics_port() -> u16 {
    9100
}

/// Allowed CORS origins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

/// Validated dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub node_names: Vec<String>,
    pub pod_names: Vec<String>,
    pub cors_origins: CorsOrigins,
    /// Port for the API and terminal websocket
    pub port: u16,
    /// Port for the standalone metrics listener
    pub metrics_port: u16,
    /// Fixed seed for the sampler, for reproducible demos
    pub rng_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            node_names: split_list(&default_node_names()),
            pod_names: split_list(&default_pod_names()),
            cors_origins: CorsOrigins::Any,
            port: default_port(),
            metrics_port: default_metrics_port(),
            rng_seed: None,
        }
    }
}

/// Split a comma-separated list, dropping blank entries
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl DashboardConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load from an explicit variable map instead of the process
    /// environment (`None` reads the real environment)
    pub fn load_from(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::default().source(vars))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let node_names = split_list(&raw.node_names);
        if node_names.is_empty() {
            return Err(ConfigError::EmptyNodePool);
        }

        let pod_names = split_list(&raw.pod_names);
        if pod_names.is_empty() {
            return Err(ConfigError::EmptyPodPool);
        }

        let cors_origins = parse_cors_origins(&raw.cors_origins)?;

        Ok(Self {
            node_names,
            pod_names,
            cors_origins,
            port: raw.port,
            metrics_port: raw.metrics_port,
            rng_seed: raw.rng_seed,
        })
    }
}

fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins = split_list(raw);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsOrigins::Any);
    }

    for origin in &origins {
        HeaderValue::from_str(origin)
            .map_err(|_| ConfigError::InvalidCorsOrigin(origin.clone()))?;
    }

    Ok(CorsOrigins::List(origins))
}
