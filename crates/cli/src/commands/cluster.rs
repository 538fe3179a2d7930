//! Cluster state, node detail and health CLI commands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{
    ApiClient, ClusterSnapshot, HealthResponse, HistorySeries, NodeDetail, ReadinessResponse,
};
use crate::output::{
    color_status, color_usage, format_percent, format_timestamp, print_heading, print_info,
    print_json, print_rows, print_warning, OutputFormat,
};

/// Row for the nodes table
#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Pods")]
    pods: u8,
}

/// Row for the pods table
#[derive(Tabled)]
struct PodRow {
    #[tabled(rename = "Pod")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Restarts")]
    restarts: u8,
}

/// Row for the history table
#[derive(Debug, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Avg CPU")]
    cpu: String,
    #[tabled(rename = "Avg Memory")]
    memory: String,
}

/// Row for the component health table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Show one cluster snapshot
pub async fn show_status(client: &ApiClient, show_pods: bool, format: OutputFormat) -> Result<()> {
    let snapshot: ClusterSnapshot = client.get("api/k8s").await?;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => {
            print_heading("Cluster Status");
            println!(
                "Average CPU:            {}",
                color_usage(snapshot.averages.cpu)
            );
            println!(
                "Average Memory:         {}",
                color_usage(snapshot.averages.memory)
            );
            println!("Pods:                   {}", snapshot.pods.len());
            println!();

            let not_ready = snapshot
                .nodes
                .iter()
                .filter(|n| n.status != "Ready")
                .count();
            if not_ready > 0 {
                print_warning(&format!("{} node(s) not ready", not_ready));
            }

            let nodes = snapshot
                .nodes
                .iter()
                .map(|node| NodeRow {
                    name: node.name.clone(),
                    status: color_status(&node.status),
                    cpu: color_usage(node.cpu as f64),
                    memory: color_usage(node.memory as f64),
                    pods: node.pods,
                })
                .collect();
            print_rows::<NodeRow>(nodes);

            if show_pods {
                println!();
                println!("{}", "Pods".bold());
                println!("{}", "-".repeat(50));
                let pods = snapshot
                    .pods
                    .iter()
                    .map(|pod| PodRow {
                        name: pod.name.clone(),
                        status: color_status(&pod.status),
                        node: pod.node.clone(),
                        age: pod.age.clone(),
                        restarts: pod.restarts,
                    })
                    .collect();
                print_rows::<PodRow>(pods);
            }

            println!();
            println!("{}", "History".bold());
            println!("{}", "-".repeat(50));
            print_rows(history_rows(&snapshot.historical));

            println!();
            println!(
                "Last updated: {}",
                format_timestamp(&snapshot.last_updated).dimmed()
            );
        }
    }

    Ok(())
}

/// Show the detail view for one node
pub async fn show_node(client: &ApiClient, name: &str, format: OutputFormat) -> Result<()> {
    let detail: NodeDetail = client.get(&format!("api/nodes/{}", name)).await?;

    match format {
        OutputFormat::Json => print_json(&detail)?,
        OutputFormat::Table => {
            print_heading(&format!("Node {}", detail.name));
            println!("Status:                 {}", color_status(&detail.status));
            println!();

            println!("{}", "Capacity".bold());
            println!("{}", "-".repeat(50));
            println!("CPU:                    {} cores", detail.capacity.cpu);
            println!("Memory:                 {}", detail.capacity.memory);
            println!("Pods:                   {}", detail.capacity.pods);
            println!();

            println!("{}", "Usage".bold());
            println!("{}", "-".repeat(50));
            println!("CPU:                    {}", detail.usage.cpu);
            println!("Memory:                 {}", detail.usage.memory);
            println!("Pods:                   {}", detail.usage.pods);
            println!();

            for condition in &detail.conditions {
                println!(
                    "{} {} (heartbeat {})",
                    format!("{}:", condition.condition_type).bold(),
                    color_status(&condition.status),
                    format_timestamp(&condition.last_heartbeat_time).dimmed()
                );
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct HealthReport {
    health: HealthResponse,
    readiness: ReadinessResponse,
}

/// Show aggregate health and readiness
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (_, health): (u16, HealthResponse) = client.get_with_status("health").await?;
    let (_, readiness): (u16, ReadinessResponse) = client.get_with_status("readyz").await?;

    match format {
        OutputFormat::Json => print_json(&HealthReport { health, readiness })?,
        OutputFormat::Table => {
            print_heading("Dashboard Health");
            println!("Status:                 {}", color_status(&health.status));
            match (readiness.ready, readiness.reason.as_deref()) {
                (true, _) => print_info("Ready to serve traffic"),
                (false, Some(reason)) => print_warning(&format!("Not ready: {}", reason)),
                (false, None) => print_warning("Not ready"),
            }
            println!();

            let mut components: Vec<_> = health.components.iter().collect();
            components.sort_by(|a, b| a.0.cmp(b.0));
            let rows = components
                .into_iter()
                .map(|(name, component)| ComponentRow {
                    name: name.clone(),
                    status: color_status(&component.status),
                    message: component.message.clone().unwrap_or_default(),
                })
                .collect();
            print_rows::<ComponentRow>(rows);
        }
    }

    Ok(())
}

fn history_rows(history: &HistorySeries) -> Vec<HistoryRow> {
    history
        .timestamps
        .iter()
        .zip(&history.cpu)
        .zip(&history.memory)
        .map(|((time, cpu), memory)| HistoryRow {
            time: time.clone(),
            cpu: format_percent(*cpu),
            memory: format_percent(*memory),
        })
        .collect()
}
