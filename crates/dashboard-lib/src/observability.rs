//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Prometheus gauges mirroring the latest simulated cluster aggregates
//! - Request, terminal and error counters plus a snapshot latency histogram
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge, register_histogram, register_int_counter_vec, register_int_gauge, Gauge,
    Histogram, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for snapshot generation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    cluster_alerts: IntGauge,
    cluster_cpu_usage: Gauge,
    cluster_memory_usage: Gauge,
    cluster_pods: IntGauge,
    cluster_nodes: IntGauge,
    requests_total: IntCounterVec,
    terminal_commands_total: IntCounterVec,
    handler_errors_total: IntCounterVec,
    snapshot_latency_seconds: Histogram,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            cluster_alerts: register_int_gauge!("cluster_alerts", "Active cluster alerts")
                .expect("Failed to register cluster_alerts"),

            cluster_cpu_usage: register_gauge!(
                "cluster_cpu_usage",
                "Cluster CPU usage percent"
            )
            .expect("Failed to register cluster_cpu_usage"),

            cluster_memory_usage: register_gauge!(
                "cluster_memory_usage",
                "Cluster memory usage percent"
            )
            .expect("Failed to register cluster_memory_usage"),

            cluster_pods: register_int_gauge!("cluster_pods", "Number of running pods")
                .expect("Failed to register cluster_pods"),

            cluster_nodes: register_int_gauge!("cluster_nodes", "Number of active nodes")
                .expect("Failed to register cluster_nodes"),

            requests_total: register_int_counter_vec!(
                "dashboard_requests_total",
                "API requests served, by endpoint",
                &["endpoint"]
            )
            .expect("Failed to register dashboard_requests_total"),

            terminal_commands_total: register_int_counter_vec!(
                "dashboard_terminal_commands_total",
                "Terminal commands received, by gate outcome",
                &["outcome"]
            )
            .expect("Failed to register dashboard_terminal_commands_total"),

            handler_errors_total: register_int_counter_vec!(
                "dashboard_handler_errors_total",
                "Requests that ended in an internal error, by endpoint",
                &["endpoint"]
            )
            .expect("Failed to register dashboard_handler_errors_total"),

            snapshot_latency_seconds: register_histogram!(
                "dashboard_snapshot_latency_seconds",
                "Time spent generating a cluster snapshot",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register dashboard_snapshot_latency_seconds"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// Lightweight handle to the process-wide metrics; clones share the same
/// gauges.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    /// Create a handle, registering the metrics on first call
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new)
    }

    /// Mirror the aggregates of the latest snapshot
    pub fn record_snapshot(&self, avg_cpu: f64, avg_memory: f64, pods: usize, nodes: usize) {
        let inner = self.inner();
        inner.cluster_cpu_usage.set(avg_cpu);
        inner.cluster_memory_usage.set(avg_memory);
        inner.cluster_pods.set(pods as i64);
        inner.cluster_nodes.set(nodes as i64);
    }

    pub fn set_alerts(&self, count: usize) {
        self.inner().cluster_alerts.set(count as i64);
    }

    pub fn observe_snapshot_latency(&self, duration_secs: f64) {
        self.inner().snapshot_latency_seconds.observe(duration_secs);
    }

    pub fn inc_request(&self, endpoint: &str) {
        self.inner()
            .requests_total
            .with_label_values(&[endpoint])
            .inc();
    }

    /// `outcome` is one of `executed`, `rejected`, `invalid`
    pub fn inc_terminal_command(&self, outcome: &str) {
        self.inner()
            .terminal_commands_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn inc_handler_error(&self, endpoint: &str) {
        self.inner()
            .handler_errors_total
            .with_label_values(&[endpoint])
            .inc();
    }
}

/// Structured logger for dashboard events
///
/// Keeps the `event` field names consistent across the service.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, port: u16, metrics_port: u16, nodes: usize) {
        info!(
            event = "dashboard_started",
            service = %self.service,
            version = %version,
            port = port,
            metrics_port = metrics_port,
            node_pool_size = nodes,
            "Cluster dashboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            service = %self.service,
            reason = %reason,
            "Cluster dashboard shutting down"
        );
    }

    pub fn log_client_connected(&self, session_id: u64) {
        info!(
            event = "client_connected",
            service = %self.service,
            session_id = session_id,
            "Client connected"
        );
    }

    pub fn log_client_disconnected(&self, session_id: u64) {
        info!(
            event = "client_disconnected",
            service = %self.service,
            session_id = session_id,
            "Client disconnected"
        );
    }

    /// Log a terminal command and whether the gate let it through
    pub fn log_terminal_command(&self, session_id: u64, pod: &str, command: &str, outcome: &str) {
        match outcome {
            "executed" => {
                info!(
                    event = "terminal_command",
                    service = %self.service,
                    session_id = session_id,
                    pod = %pod,
                    command = %command,
                    outcome = %outcome,
                    "Simulated terminal command"
                );
            }
            _ => {
                warn!(
                    event = "terminal_command",
                    service = %self.service,
                    session_id = session_id,
                    pod = %pod,
                    command = %command,
                    outcome = %outcome,
                    "Terminal command refused"
                );
            }
        }
    }

    pub fn log_handler_error(&self, endpoint: &str, message: &str) {
        error!(
            event = "handler_error",
            service = %self.service,
            endpoint = %endpoint,
            error = %message,
            "Request handler failed"
        );
    }

    pub fn log_metrics_server(&self, addr: &str, result: Result<(), &str>) {
        match result {
            Ok(()) => {
                info!(
                    event = "metrics_server_started",
                    service = %self.service,
                    addr = %addr,
                    "Metrics server started"
                );
            }
            Err(e) => {
                error!(
                    event = "metrics_server_failed",
                    service = %self.service,
                    addr = %addr,
                    error = %e,
                    "Failed to start metrics server"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};

    fn exposition() -> String {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_dashboard_metrics_are_exported() {
        let metrics = DashboardMetrics::new();

        metrics.record_snapshot(42.5, 55.0, 12, 3);
        metrics.set_alerts(1);
        metrics.observe_snapshot_latency(0.0001);
        metrics.inc_request("k8s");
        metrics.inc_terminal_command("executed");
        metrics.inc_handler_error("scan");

        let text = exposition();
        assert!(text.contains("cluster_cpu_usage"));
        assert!(text.contains("cluster_memory_usage"));
        assert!(text.contains("cluster_pods"));
        assert!(text.contains("cluster_nodes"));
        assert!(text.contains("cluster_alerts"));
        assert!(text.contains("dashboard_requests_total{endpoint=\"k8s\"}"));
        assert!(text.contains("dashboard_terminal_commands_total{outcome=\"executed\"}"));
        assert!(text.contains("dashboard_snapshot_latency_seconds_bucket"));
    }

    #[test]
    fn test_handles_share_registry() {
        let a = DashboardMetrics::new();
        let b = a.clone();
        let c = DashboardMetrics::default();

        a.inc_request("cost");
        b.inc_request("cost");
        c.inc_request("cost");
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("cluster-dashboard");
        assert_eq!(logger.service, "cluster-dashboard");
    }
}
