//! Synthetic cluster-state generation
//!
//! Produces nodes, pods, alerts, vulnerabilities, cost figures and node
//! details with a fixed shape and random values. The only inputs are the
//! configured name pools, the caller's clock reading and an injected
//! [`RandomSource`].

mod random;
mod weighted;

pub use random::{FixedRandom, RandomSource, StdRandom};
pub use weighted::WeightedTable;

use chrono::{DateTime, Duration, Utc};

use crate::models::{
    Alert, AlertSeverity, CostBreakdown, Node, NodeCapacity, NodeCondition, NodeDetail,
    NodeStatus, NodeUsage, Pod, PodStatus, ServiceCost, Vulnerability, VulnerabilitySeverity,
};

/// Probability that a node reports NotReady
const NOT_READY_PROBABILITY: f64 = 0.1;

/// Alerts fire when a unit draw lands above this (30% of the time)
const ALERT_THRESHOLD: f64 = 0.7;

/// Year stamped into simulated CVE identifiers
const CVE_YEAR: u16 = 2023;

/// Relative weights for pod status
const POD_STATUS_WEIGHTS: &[(PodStatus, u32)] = &[
    (PodStatus::Running, 8),
    (PodStatus::Pending, 1),
    (PodStatus::Error, 1),
];

const ALERT_MESSAGES: &[&str] = &[
    "High CPU load on node-3",
    "Memory pressure on worker-2",
    "Pod crashloop detected",
    "Node disk space low",
    "Network latency increased",
];

const ALERT_SEVERITIES: &[AlertSeverity] = &[AlertSeverity::Warning, AlertSeverity::Critical];

const VULNERABILITY_SEVERITIES: &[VulnerabilitySeverity] = &[
    VulnerabilitySeverity::Critical,
    VulnerabilitySeverity::High,
    VulnerabilitySeverity::Medium,
];

const VULNERABLE_COMPONENTS: &[&str] =
    &["kube-apiserver", "etcd", "kubelet", "container-runtime"];

const VULNERABILITY_DESCRIPTIONS: &[&str] = &[
    "Privilege escalation vulnerability",
    "Denial of service risk",
    "Information disclosure flaw",
];

/// Fixed cost split per service category
pub const COST_SPLIT: &[(&str, f64)] = &[("Compute", 0.6), ("Storage", 0.25), ("Network", 0.15)];

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Generator for synthetic cluster records
pub struct RandomSampler {
    rng: Box<dyn RandomSource>,
    pod_status: WeightedTable<PodStatus>,
}

impl RandomSampler {
    pub fn new(rng: Box<dyn RandomSource>) -> Self {
        Self {
            rng,
            pod_status: WeightedTable::new(POD_STATUS_WEIGHTS),
        }
    }

    /// Sampler seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(Box::new(StdRandom::from_entropy()))
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.rng.int_in(0, items.len() as i64 - 1);
        items.get(index as usize)
    }

    /// One node per name, in input order
    ///
    /// Load rises with the index (`30 + 7*i`) and gets jitter on top, so
    /// later nodes tend to look busier.
    pub fn generate_nodes(&mut self, names: &[String]) -> Vec<Node> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let base_load = 30 + 7 * i as i64;
                let cpu = (base_load + self.rng.int_in(-15, 15)).clamp(5, 95);
                let memory = (base_load + self.rng.int_in(-10, 20)).clamp(10, 90);
                let status = if self.rng.unit() >= NOT_READY_PROBABILITY {
                    NodeStatus::Ready
                } else {
                    NodeStatus::NotReady
                };
                let pod_count = self.rng.int_in(1, 10);

                Node {
                    name: name.clone(),
                    cpu: cpu as u8,
                    memory: memory as u8,
                    status,
                    pod_count: pod_count as u8,
                }
            })
            .collect()
    }

    /// Between 8 and 25 pods, each placed on one of `nodes`
    ///
    /// Returns an empty list if either `nodes` or `pool` is empty.
    pub fn generate_pods(&mut self, nodes: &[Node], pool: &[String]) -> Vec<Pod> {
        if nodes.is_empty() || pool.is_empty() {
            return Vec::new();
        }

        let count = self.rng.int_in(8, 25);
        (0..count)
            .filter_map(|_| {
                let host = self.choose(nodes)?.name.clone();
                let base = self.choose(pool)?.clone();
                let suffix = self.rng.int_in(1000, 9999);
                let status = self.pod_status.sample(self.rng.as_mut())?;

                Some(Pod {
                    name: format!("{}-{}", base, suffix),
                    status,
                    node: host,
                    age_hours: self.rng.int_in(1, 72) as u8,
                    restarts: self.rng.int_in(0, 5) as u8,
                })
            })
            .collect()
    }

    /// A demo alert 30% of the time
    pub fn generate_alert(&mut self, now: DateTime<Utc>) -> Option<Alert> {
        if self.rng.unit() <= ALERT_THRESHOLD {
            return None;
        }

        let severity = *self.choose(ALERT_SEVERITIES)?;
        let message = self.choose(ALERT_MESSAGES)?.to_string();

        Some(Alert {
            severity,
            message,
            timestamp: now.to_rfc3339(),
        })
    }

    /// Zero to five CVE findings
    pub fn generate_vulnerabilities(&mut self) -> Vec<Vulnerability> {
        let count = self.rng.int_in(0, 5);
        (0..count)
            .filter_map(|_| {
                let suffix = self.rng.int_in(1000, 9999);
                let severity = *self.choose(VULNERABILITY_SEVERITIES)?;
                let component = self.choose(VULNERABLE_COMPONENTS)?.to_string();
                let description = self.choose(VULNERABILITY_DESCRIPTIONS)?.to_string();

                Some(Vulnerability {
                    id: format!("CVE-{}-{}", CVE_YEAR, suffix),
                    severity,
                    component,
                    description,
                })
            })
            .collect()
    }

    /// Daily cost in [150, 300] with a +/-10% monthly projection
    pub fn generate_cost(&mut self) -> CostBreakdown {
        let daily = round_to(self.rng.float_in(150.0, 300.0), 2);
        let predicted_monthly = round_to(daily * 30.0 * self.rng.float_in(0.9, 1.1), 2);
        split_cost(daily, predicted_monthly)
    }

    /// Standalone detail view for `name`
    pub fn generate_node_detail(&mut self, name: &str, now: DateTime<Utc>) -> NodeDetail {
        let capacity = NodeCapacity {
            cpu: self.rng.int_in(4, 16) as u32,
            memory: format!("{}Gi", self.rng.int_in(16, 64)),
            pods: self.rng.int_in(50, 200) as u32,
        };
        let usage = NodeUsage {
            cpu: format!("{}%", self.rng.int_in(30, 80)),
            memory: format!("{}%", self.rng.int_in(40, 90)),
            pods: self.rng.int_in(5, 40) as u32,
        };

        NodeDetail {
            name: name.to_string(),
            status: NodeStatus::Ready,
            capacity,
            usage,
            conditions: vec![NodeCondition {
                condition_type: "Ready".to_string(),
                status: "True".to_string(),
                last_heartbeat_time: (now - Duration::minutes(5)).to_rfc3339(),
            }],
        }
    }
}

/// Split a daily total across the fixed service categories
///
/// Each part is rounded on its own; the parts may drift from `daily` by a
/// cent or two.
pub fn split_cost(daily: f64, predicted_monthly: f64) -> CostBreakdown {
    let breakdown = COST_SPLIT
        .iter()
        .map(|&(service, ratio)| ServiceCost {
            service: service.to_string(),
            cost: round_to(daily * ratio, 2),
        })
        .collect();

    CostBreakdown {
        daily,
        predicted_monthly,
        breakdown,
    }
}
