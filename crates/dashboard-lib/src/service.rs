//! Cluster state service
//!
//! Single entry point for simulated cluster data. Each call builds a fresh
//! set of records from the sampler; `snapshot()` also appends the cluster
//! averages to the shared rolling history and mirrors them into the
//! Prometheus gauges.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::ConfigError;
use crate::history::HistoryBuffer;
use crate::models::{
    Alert, Averages, ClusterSnapshot, CostReport, HistorySeries, Node, NodeDetail, ScanResult,
};
use crate::observability::DashboardMetrics;
use crate::sampler::{round_to, RandomSampler, StdRandom};

/// Name pools the sampler draws from; never empty
#[derive(Debug, Clone)]
pub struct NamePools {
    nodes: Vec<String>,
    pods: Vec<String>,
}

impl NamePools {
    pub fn new(nodes: Vec<String>, pods: Vec<String>) -> Result<Self, ConfigError> {
        if nodes.is_empty() {
            return Err(ConfigError::EmptyNodePool);
        }
        if pods.is_empty() {
            return Err(ConfigError::EmptyPodPool);
        }
        Ok(Self { nodes, pods })
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn pods(&self) -> &[String] {
        &self.pods
    }
}

/// Mean of a node metric rounded to one decimal
fn average(nodes: &[Node], metric: impl Fn(&Node) -> u8) -> f64 {
    if nodes.is_empty() {
        return 0.0;
    }
    let sum: u32 = nodes.iter().map(|n| u32::from(metric(n))).sum();
    round_to(f64::from(sum) / nodes.len() as f64, 1)
}

/// Produces snapshots and owns the rolling history
#[derive(Clone)]
pub struct ClusterStateService {
    pools: Arc<NamePools>,
    sampler: Arc<Mutex<RandomSampler>>,
    history: Arc<Mutex<HistoryBuffer>>,
    metrics: DashboardMetrics,
}

impl ClusterStateService {
    pub fn new(
        pools: NamePools,
        sampler: RandomSampler,
        history: HistoryBuffer,
        metrics: DashboardMetrics,
    ) -> Self {
        Self {
            pools: Arc::new(pools),
            sampler: Arc::new(Mutex::new(sampler)),
            history: Arc::new(Mutex::new(history)),
            metrics,
        }
    }

    /// Build the service from validated configuration
    pub fn from_config(
        config: &DashboardConfig,
        metrics: DashboardMetrics,
    ) -> Result<Self, ConfigError> {
        let pools = NamePools::new(config.node_names.clone(), config.pod_names.clone())?;
        let rng = match config.rng_seed {
            Some(seed) => StdRandom::seeded(seed),
            None => StdRandom::from_entropy(),
        };

        Ok(Self::new(
            pools,
            RandomSampler::new(Box::new(rng)),
            HistoryBuffer::new(),
            metrics,
        ))
    }

    pub fn pools(&self) -> &NamePools {
        &self.pools
    }

    /// Current snapshot at the wall clock time
    pub async fn snapshot(&self) -> ClusterSnapshot {
        self.snapshot_at(Utc::now()).await
    }

    /// Generate nodes and pods, record the averages and return everything
    /// together with the history window
    pub async fn snapshot_at(&self, now: DateTime<Utc>) -> ClusterSnapshot {
        let started = Instant::now();

        let (nodes, pods) = {
            let mut sampler = self.sampler.lock().await;
            let nodes = sampler.generate_nodes(self.pools.nodes());
            let pods = sampler.generate_pods(&nodes, self.pools.pods());
            (nodes, pods)
        };

        let averages = Averages {
            cpu: average(&nodes, |n| n.cpu),
            memory: average(&nodes, |n| n.memory),
        };

        // Gauges are set under the history lock so they always match the
        // newest history point
        let historical = {
            let mut history = self.history.lock().await;
            history.append(now.format("%H:%M").to_string(), averages.cpu, averages.memory);
            self.metrics
                .record_snapshot(averages.cpu, averages.memory, pods.len(), nodes.len());
            history.snapshot()
        };

        self.metrics
            .observe_snapshot_latency(started.elapsed().as_secs_f64());

        debug!(
            nodes = nodes.len(),
            pods = pods.len(),
            avg_cpu = averages.cpu,
            avg_memory = averages.memory,
            history_len = historical.len(),
            "Generated cluster snapshot"
        );

        ClusterSnapshot {
            nodes,
            pods,
            status: "success".to_string(),
            last_updated: now.to_rfc3339(),
            averages,
            historical,
        }
    }

    /// Zero or one demo alert
    pub async fn alerts(&self) -> Vec<Alert> {
        let alert = self.sampler.lock().await.generate_alert(Utc::now());
        let alerts: Vec<Alert> = alert.into_iter().collect();
        self.metrics.set_alerts(alerts.len());
        alerts
    }

    pub async fn scan(&self) -> ScanResult {
        let vulnerabilities = self.sampler.lock().await.generate_vulnerabilities();
        ScanResult {
            status: "completed".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            vulnerabilities,
        }
    }

    pub async fn cost(&self) -> CostReport {
        let cost = self.sampler.lock().await.generate_cost();
        CostReport {
            cost,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Detail for any node name; not checked against snapshot nodes
    pub async fn node_detail(&self, name: &str) -> NodeDetail {
        self.sampler
            .lock()
            .await
            .generate_node_detail(name, Utc::now())
    }

    /// Current history window without generating a new point
    pub async fn history(&self) -> HistorySeries {
        self.history.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;
    use crate::models::NodeStatus;
    use crate::sampler::FixedRandom;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn pools() -> NamePools {
        NamePools::new(
            vec![
                "k8s-node-1".to_string(),
                "k8s-node-2".to_string(),
                "k8s-node-3".to_string(),
            ],
            vec!["nginx".to_string(), "redis".to_string()],
        )
        .unwrap()
    }

    fn seeded_service(seed: u64) -> ClusterStateService {
        ClusterStateService::new(
            pools(),
            RandomSampler::new(Box::new(StdRandom::seeded(seed))),
            HistoryBuffer::new(),
            DashboardMetrics::new(),
        )
    }

    #[test]
    fn test_name_pools_reject_empty() {
        assert!(matches!(
            NamePools::new(vec![], vec!["a".to_string()]),
            Err(ConfigError::EmptyNodePool)
        ));
        assert!(matches!(
            NamePools::new(vec!["a".to_string()], vec![]),
            Err(ConfigError::EmptyPodPool)
        ));
    }

    #[test]
    fn test_average_rounds_to_one_decimal() {
        let node = |cpu| Node {
            name: "n".to_string(),
            cpu,
            memory: 50,
            status: NodeStatus::Ready,
            pod_count: 1,
        };
        let nodes = vec![node(30), node(31), node(31)];
        assert_eq!(average(&nodes, |n| n.cpu), 30.7);
        assert_eq!(average(&[], |n| n.cpu), 0.0);
    }

    #[tokio::test]
    async fn test_snapshot_shape() {
        let service = seeded_service(11);
        let snapshot = service.snapshot().await;

        assert_eq!(snapshot.status, "success");
        assert_eq!(snapshot.nodes.len(), 3);
        assert!((8..=25).contains(&snapshot.pods.len()));

        let names: HashSet<&str> = snapshot.nodes.iter().map(|n| n.name.as_str()).collect();
        assert!(snapshot.pods.iter().all(|p| names.contains(p.node.as_str())));

        assert_eq!(snapshot.historical.len(), 1);
        assert_eq!(snapshot.historical.cpu[0], snapshot.averages.cpu);
        assert_eq!(snapshot.historical.memory[0], snapshot.averages.memory);
    }

    #[tokio::test]
    async fn test_zero_jitter_snapshot_averages() {
        let service = ClusterStateService::new(
            pools(),
            RandomSampler::new(Box::new(FixedRandom::zero())),
            HistoryBuffer::new(),
            DashboardMetrics::new(),
        );

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 7, 0).unwrap();
        let snapshot = service.snapshot_at(now).await;

        // base loads 30, 37, 44
        assert_eq!(snapshot.averages.cpu, 37.0);
        assert_eq!(snapshot.averages.memory, 37.0);
        assert_eq!(snapshot.historical.timestamps, vec!["09:07"]);
        assert_eq!(snapshot.last_updated, now.to_rfc3339());
    }

    #[tokio::test]
    async fn test_history_is_bounded_across_snapshots() {
        let service = seeded_service(12);

        let mut last = None;
        for _ in 0..(HISTORY_CAPACITY + 8) {
            last = Some(service.snapshot().await);
        }

        let last = last.unwrap();
        assert_eq!(last.historical.len(), HISTORY_CAPACITY);
        assert_eq!(last.historical.cpu.len(), HISTORY_CAPACITY);
        assert_eq!(last.historical.memory.len(), HISTORY_CAPACITY);
        assert_eq!(*last.historical.cpu.last().unwrap(), last.averages.cpu);
        assert_eq!(service.history().await, last.historical);
    }

    #[tokio::test]
    async fn test_concurrent_snapshots_keep_series_aligned() {
        let service = seeded_service(13);

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.snapshot().await })
            })
            .collect();

        for handle in handles {
            let snapshot = handle.await.unwrap();
            let h = &snapshot.historical;
            assert_eq!(h.timestamps.len(), h.cpu.len());
            assert_eq!(h.cpu.len(), h.memory.len());
            assert!(h.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(service.history().await.len(), HISTORY_CAPACITY);
    }

    #[tokio::test]
    async fn test_alerts_never_exceed_one() {
        let service = seeded_service(14);
        for _ in 0..100 {
            assert!(service.alerts().await.len() <= 1);
        }
    }

    #[tokio::test]
    async fn test_scan_and_cost() {
        let service = seeded_service(15);

        let scan = service.scan().await;
        assert_eq!(scan.status, "completed");
        assert!(scan.vulnerabilities.len() <= 5);

        let report = service.cost().await;
        assert!((150.0..=300.0).contains(&report.cost.daily));
        assert_eq!(report.cost.breakdown.len(), 3);
    }

    #[tokio::test]
    async fn test_node_detail_accepts_unknown_names() {
        let service = seeded_service(16);
        let detail = service.node_detail("not-in-any-snapshot").await;
        assert_eq!(detail.name, "not-in-any-snapshot");
        assert!(service.history().await.is_empty());
    }

    #[test]
    fn test_from_config_rejects_empty_pools() {
        let config = DashboardConfig {
            node_names: vec![],
            ..DashboardConfig::default()
        };
        assert!(ClusterStateService::from_config(&config, DashboardMetrics::new()).is_err());
    }
}
