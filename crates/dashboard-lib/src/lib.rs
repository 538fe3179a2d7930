//! Library for the simulated cluster dashboard
//!
//! This crate provides:
//! - Synthetic node, pod, alert, vulnerability and cost generation
//! - A bounded rolling history of cluster averages
//! - An allow-list gate and scripted responder for the pod terminal
//! - The HTTP/websocket API, health checks and observability

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod health;
pub mod history;
pub mod models;
pub mod observability;
pub mod sampler;
pub mod service;
pub mod terminal;

pub use config::{CorsOrigins, DashboardConfig};
pub use error::{ApiError, ConfigError, ErrorBody};
pub use gate::{CommandGate, CommandToken, RejectionReason, ALLOWED_COMMANDS};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use history::{HistoryBuffer, HistoryPoint, HISTORY_CAPACITY};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use sampler::{FixedRandom, RandomSampler, RandomSource, StdRandom};
pub use service::{ClusterStateService, NamePools};
pub use terminal::{ClientEvent, ServerEvent, SessionState, TerminalSession};
