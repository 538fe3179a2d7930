//! Cost CLI command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, CostReport};
use crate::output::{
    format_currency, format_timestamp, print_heading, print_json, print_rows, OutputFormat,
};

/// Row for the per-service breakdown table
#[derive(Tabled)]
struct ServiceCostRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Daily Cost")]
    cost: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Show the daily cost estimate
pub async fn show_cost(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report: CostReport = client.get("api/cost").await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            print_heading("Cost Estimate");
            println!("Daily:                  {}", format_currency(report.daily));
            println!(
                "{} {}",
                "Predicted Monthly:     ".bold(),
                format_currency(report.predicted_monthly).green().bold()
            );
            println!();

            println!("{}", "Breakdown".bold());
            println!("{}", "-".repeat(50));
            print_rows(breakdown_rows(&report));

            println!();
            println!(
                "Last updated: {}",
                format_timestamp(&report.timestamp).dimmed()
            );
        }
    }

    Ok(())
}

fn breakdown_rows(report: &CostReport) -> Vec<ServiceCostRow> {
    report
        .breakdown
        .iter()
        .map(|part| {
            let share = if report.daily > 0.0 {
                part.cost / report.daily * 100.0
            } else {
                0.0
            };
            ServiceCostRow {
                service: part.service.clone(),
                cost: format_currency(part.cost),
                share: format!("{:.0}%", share),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ServiceCost;

    #[test]
    fn test_breakdown_shares() {
        let report = CostReport {
            daily: 200.0,
            predicted_monthly: 6600.0,
            breakdown: vec![
                ServiceCost {
                    service: "Compute".to_string(),
                    cost: 120.0,
                },
                ServiceCost {
                    service: "Storage".to_string(),
                    cost: 50.0,
                },
            ],
            timestamp: "2024-03-01T10:15:00+00:00".to_string(),
        };

        let rows = breakdown_rows(&report);
        assert_eq!(rows[0].share, "60%");
        assert_eq!(rows[0].cost, "$120.00");
        assert_eq!(rows[1].share, "25%");
    }
}
