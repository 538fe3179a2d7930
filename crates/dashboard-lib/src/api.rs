//! HTTP API: dashboard data, terminal websocket, health and metrics

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures_util::FutureExt;
use prometheus::{Encoder, TextEncoder};
use std::any::Any as PanicPayload;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::CorsOrigins;
use crate::error::ApiError;
use crate::health::{components, HealthRegistry, HealthResponse};
use crate::models::{Alert, ClusterSnapshot, CostReport, NodeDetail, ScanResult};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::service::ClusterStateService;
use crate::terminal::{serve_socket, TerminalSession};

/// Shared application state
pub struct AppState {
    pub service: ClusterStateService,
    pub health_registry: HealthRegistry,
    pub metrics: DashboardMetrics,
    pub logger: StructuredLogger,
    next_session_id: AtomicU64,
}

impl AppState {
    pub fn new(
        service: ClusterStateService,
        health_registry: HealthRegistry,
        metrics: DashboardMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            service,
            health_registry,
            metrics,
            logger,
            next_session_id: AtomicU64::new(1),
        }
    }

    fn next_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn panic_message(payload: &(dyn PanicPayload + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal error".to_string()
    }
}

/// Run a handler body, turning a panic into the generic 500 response
async fn guarded<T, F>(state: &AppState, endpoint: &'static str, body: F) -> Result<T, ApiError>
where
    F: Future<Output = T>,
{
    state.metrics.inc_request(endpoint);

    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(value) => Ok(value),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            state.logger.log_handler_error(endpoint, &message);
            state.metrics.inc_handler_error(endpoint);
            Err(ApiError::internal(message))
        }
    }
}

async fn cluster_data(State(state): State<Arc<AppState>>) -> Result<Json<ClusterSnapshot>, ApiError> {
    guarded(&state, "k8s", state.service.snapshot())
        .await
        .map(Json)
}

/// Bare array of zero or one alert
async fn alerts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Alert>>, ApiError> {
    guarded(&state, "alerts", state.service.alerts())
        .await
        .map(Json)
}

async fn scan(State(state): State<Arc<AppState>>) -> Result<Json<ScanResult>, ApiError> {
    guarded(&state, "scan", state.service.scan()).await.map(Json)
}

async fn cost(State(state): State<Arc<AppState>>) -> Result<Json<CostReport>, ApiError> {
    guarded(&state, "cost", state.service.cost()).await.map(Json)
}

async fn node_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<NodeDetail>, ApiError> {
    guarded(&state, "node_detail", state.service.node_detail(&name))
        .await
        .map(Json)
}

/// Liveness: `healthy` whenever the process answers, with side listeners
/// reported under `components`
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health_registry.health().await)
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus text exposition of the process registry
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ApiError::internal(format!("failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

/// Upgrade to the simulated terminal
async fn terminal(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = TerminalSession::new(
        state.next_session_id(),
        state.logger.clone(),
        state.metrics.clone(),
    );
    ws.on_upgrade(move |socket| serve_socket(socket, session))
}

/// CORS policy from configured origins
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::from(Any),
        CorsOrigins::List(list) => AllowOrigin::list(
            list.iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the API router
pub fn create_router(state: Arc<AppState>, origins: &CorsOrigins) -> Router {
    Router::new()
        .route("/api/k8s", get(cluster_data))
        .route("/api/alerts", get(alerts))
        .route("/api/scan", post(scan))
        .route("/api/cost", get(cost))
        .route("/api/nodes/:name", get(node_detail))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/ws", get(terminal))
        .layer(cors_layer(origins))
        .with_state(state)
}

/// Router for the standalone scrape listener
pub fn create_metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics))
}

/// Start the API server
pub async fn serve(port: u16, app: Router) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Start the scrape listener once in the background
///
/// A bind failure is logged and marks the metrics server degraded; the API
/// keeps running and still serves `/metrics` itself.
pub fn spawn_metrics_server(port: u16, state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = format!("0.0.0.0:{}", port);

        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                let message = e.to_string();
                state.logger.log_metrics_server(&addr, Err(&message));
                state
                    .health_registry
                    .set_degraded(components::METRICS_SERVER, message)
                    .await;
                return;
            }
        };

        state.logger.log_metrics_server(&addr, Ok(()));
        state
            .health_registry
            .set_healthy(components::METRICS_SERVER)
            .await;

        if let Err(e) = axum::serve(listener, create_metrics_router()).await {
            let message = e.to_string();
            state.logger.log_metrics_server(&addr, Err(&message));
            state
                .health_registry
                .set_degraded(components::METRICS_SERVER, message)
                .await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn PanicPayload + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn PanicPayload + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn PanicPayload + Send> = Box::new(42u32);
        assert_eq!(panic_message(payload.as_ref()), "internal error");
    }

    #[test]
    fn test_cors_layer_builds_for_both_policies() {
        let _ = cors_layer(&CorsOrigins::Any);
        let _ = cors_layer(&CorsOrigins::List(vec!["https://a.example".to_string()]));
    }
}
