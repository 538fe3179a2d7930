//! Core data models for the cluster dashboard
//!
//! Every record here is a value object built fresh per request. The field
//! names and casing match what the browser UI reads from the JSON payloads.

use serde::{Deserialize, Serialize};

/// Readiness of a simulated node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    Ready,
    NotReady,
}

/// A simulated cluster node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    /// CPU utilisation percent, always within [5, 95]
    pub cpu: u8,
    /// Memory utilisation percent, always within [10, 90]
    pub memory: u8,
    pub status: NodeStatus,
    /// Number of pods scheduled on the node
    #[serde(rename = "pods")]
    pub pod_count: u8,
}

/// Lifecycle phase of a simulated pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodStatus {
    Running,
    Pending,
    Error,
}

/// A simulated pod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    pub name: String,
    pub status: PodStatus,
    /// Name of a node from the same snapshot
    pub node: String,
    #[serde(rename = "age", with = "age_hours")]
    pub age_hours: u8,
    pub restarts: u8,
}

/// Pod age travels as `"<n>h"` on the wire.
mod age_hours {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hours: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}h", hours))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim_end_matches('h')
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid pod age: {}", raw)))
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// A demo cluster alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Severity of a simulated CVE finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilitySeverity {
    Critical,
    High,
    Medium,
}

/// A simulated vulnerability finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// `CVE-<year>-<4 digits>`
    pub id: String,
    pub severity: VulnerabilitySeverity,
    pub component: String,
    pub description: String,
}

/// Result of a security scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: String,
    pub timestamp: String,
    pub vulnerabilities: Vec<Vulnerability>,
}

/// Cost attributed to one service category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub cost: f64,
}

/// Daily and projected monthly cost estimate
///
/// The per-service parts are rounded independently, so they are not
/// guaranteed to add up to `daily` to the cent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub daily: f64,
    pub predicted_monthly: f64,
    pub breakdown: Vec<ServiceCost>,
}

/// Cost payload returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostReport {
    #[serde(flatten)]
    pub cost: CostBreakdown,
    pub timestamp: String,
}

/// Node capacity in the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCapacity {
    /// Cores
    pub cpu: u32,
    /// e.g. `"32Gi"`
    pub memory: String,
    pub pods: u32,
}

/// Node usage in the detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeUsage {
    /// e.g. `"54%"`
    pub cpu: String,
    pub memory: String,
    pub pods: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub last_heartbeat_time: String,
}

/// Detail view for a single node
///
/// Generated independently of any snapshot; the name is echoed back as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDetail {
    pub name: String,
    pub status: NodeStatus,
    pub capacity: NodeCapacity,
    pub usage: NodeUsage,
    pub conditions: Vec<NodeCondition>,
}

/// Cluster-wide averages for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    pub cpu: f64,
    pub memory: f64,
}

/// Rolling history as three parallel series of equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub timestamps: Vec<String>,
    pub cpu: Vec<f64>,
    pub memory: Vec<f64>,
}

impl HistorySeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// One complete simulated cluster-state response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub nodes: Vec<Node>,
    pub pods: Vec<Pod>,
    pub status: String,
    pub last_updated: String,
    pub averages: Averages,
    pub historical: HistorySeries,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_serializes_age_with_hour_suffix() {
        let pod = Pod {
            name: "nginx-1234".to_string(),
            status: PodStatus::Running,
            node: "k8s-node-1".to_string(),
            age_hours: 12,
            restarts: 0,
        };

        let json = serde_json::to_value(&pod).unwrap();
        assert_eq!(json["age"], "12h");
        assert_eq!(json["status"], "Running");

        let back: Pod = serde_json::from_value(json).unwrap();
        assert_eq!(back.age_hours, 12);
    }

    #[test]
    fn test_node_pod_count_uses_pods_key() {
        let node = Node {
            name: "k8s-node-1".to_string(),
            cpu: 40,
            memory: 50,
            status: NodeStatus::NotReady,
            pod_count: 3,
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["pods"], 3);
        assert_eq!(json["status"], "NotReady");
    }

    #[test]
    fn test_cost_report_is_flattened() {
        let report = CostReport {
            cost: CostBreakdown {
                daily: 200.0,
                predicted_monthly: 6000.0,
                breakdown: vec![ServiceCost {
                    service: "Compute".to_string(),
                    cost: 120.0,
                }],
            },
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["daily"], 200.0);
        assert_eq!(json["predicted_monthly"], 6000.0);
        assert_eq!(json["breakdown"][0]["service"], "Compute");
        assert!(json.get("cost").is_none());
    }

    #[test]
    fn test_node_condition_keys_are_camel_case() {
        let condition = NodeCondition {
            condition_type: "Ready".to_string(),
            status: "True".to_string(),
            last_heartbeat_time: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json["type"], "Ready");
        assert!(json.get("lastHeartbeatTime").is_some());
    }
}
