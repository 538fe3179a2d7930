//! Alert and security scan CLI commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{Alert, ApiClient, ScanResult};
use crate::output::{
    color_status, format_timestamp, print_heading, print_json, print_rows, print_success,
    print_warning, OutputFormat,
};

/// Row for the alerts table
#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Time")]
    time: String,
}

/// Row for the vulnerability table
#[derive(Tabled)]
struct VulnerabilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Show the current alerts
pub async fn show_alerts(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let alerts: Vec<Alert> = client.get("api/alerts").await?;

    match format {
        OutputFormat::Json => print_json(&alerts)?,
        OutputFormat::Table => {
            if alerts.is_empty() {
                print_success("No active alerts");
                return Ok(());
            }

            let rows = alerts
                .iter()
                .map(|alert| AlertRow {
                    severity: color_status(&alert.severity),
                    message: alert.message.clone(),
                    time: format_timestamp(&alert.timestamp),
                })
                .collect();
            print_rows::<AlertRow>(rows);
        }
    }

    Ok(())
}

/// Trigger a scan and list its findings
pub async fn run_scan(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let scan: ScanResult = client.post("api/scan").await?;

    match format {
        OutputFormat::Json => print_json(&scan)?,
        OutputFormat::Table => {
            print_heading("Security Scan");
            println!("Status:                 {}", color_status(&scan.status));
            println!(
                "Finished:               {}",
                format_timestamp(&scan.timestamp).dimmed()
            );
            println!();

            if scan.vulnerabilities.is_empty() {
                print_success("No vulnerabilities found");
                return Ok(());
            }

            print_warning(&format!(
                "{} vulnerabilities found",
                scan.vulnerabilities.len()
            ));
            let rows = scan
                .vulnerabilities
                .iter()
                .map(|vuln| VulnerabilityRow {
                    id: vuln.id.clone(),
                    severity: color_status(&vuln.severity),
                    component: vuln.component.clone(),
                    description: vuln.description.clone(),
                })
                .collect();
            print_rows::<VulnerabilityRow>(rows);
        }
    }

    Ok(())
}
