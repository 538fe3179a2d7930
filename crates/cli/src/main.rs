//! Cluster Dashboard CLI
//!
//! A command-line client for the dashboard API: cluster snapshots, alerts,
//! security scans, cost estimates and node details.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{cluster, cost, security};

const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Cluster Dashboard CLI
#[derive(Parser)]
#[command(name = "kdash")]
#[command(author, version, about = "CLI for the Cluster Dashboard", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via KDASH_API_URL env var)
    #[arg(long, env = "KDASH_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show nodes, pods and the utilisation history
    Status {
        /// Also list every pod
        #[arg(long)]
        pods: bool,
    },

    /// Show the current demo alerts
    Alerts,

    /// Run a simulated security scan
    Scan,

    /// Show the daily cost estimate and monthly projection
    Cost,

    /// Show the detail view for a node
    Node {
        /// Node name
        name: String,
    },

    /// Show dashboard health and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let file_config = config::Config::load()?;

    let api_url = cli
        .api_url
        .or(file_config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let format = match cli.format {
        Some(format) => format,
        None => file_config.default_format()?,
    };

    let client = client::ApiClient::new(&api_url)?;

    match cli.command {
        Commands::Status { pods } => {
            cluster::show_status(&client, pods, format).await?;
        }
        Commands::Alerts => {
            security::show_alerts(&client, format).await?;
        }
        Commands::Scan => {
            security::run_scan(&client, format).await?;
        }
        Commands::Cost => {
            cost::show_cost(&client, format).await?;
        }
        Commands::Node { name } => {
            cluster::show_node(&client, &name, format).await?;
        }
        Commands::Health => {
            cluster::show_health(&client, format).await?;
        }
    }

    Ok(())
}
