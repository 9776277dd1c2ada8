//! Read-only status commands: health, alerts and statistics

use anyhow::Result;
use colored::Colorize;
use monitor_lib::FieldStats;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_severity, format_timestamp, print_info, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

/// Row for the alerts table
#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Row for the statistics table
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std")]
    std: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

impl StatsRow {
    fn new(field: &str, unit: &str, stats: &FieldStats) -> Self {
        Self {
            field: format!("{} ({})", field, unit),
            mean: format!("{:.3}", stats.mean),
            std: format!("{:.3}", stats.std),
            min: format!("{:.3}", stats.min),
            max: format!("{:.3}", stats.max),
        }
    }
}

/// Show service health
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            print_success(&format!("Service is {}", health.status));
            if health.model_ready {
                print_info("Anomaly model is trained");
            } else {
                print_warning("Anomaly model not trained yet (needs 60 samples)");
            }
        }
    }

    Ok(())
}

/// Show the most recent alerts
pub async fn show_alerts(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let list = client.alerts().await?;

    match format {
        OutputFormat::Json => print_json(&list)?,
        OutputFormat::Table => {
            if list.alerts.is_empty() {
                print_success("No alerts");
                return Ok(());
            }
            let rows: Vec<AlertRow> = list
                .alerts
                .iter()
                .map(|a| AlertRow {
                    time: format_timestamp(a.timestamp),
                    severity: color_severity(a.severity),
                    kind: a.kind.to_string(),
                    message: a.message.clone(),
                })
                .collect();
            println!("{}", "Recent Alerts".bold());
            print_table(&rows);
        }
    }

    Ok(())
}

/// Show window statistics
pub async fn show_stats(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let stats = client.stats().await?;

    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Table => {
            println!("{}", "Telemetry Statistics".bold());
            println!("Data points:  {}", stats.data_points.to_string().cyan());
            let rows = vec![
                StatsRow::new("current", "A", &stats.statistics.current),
                StatsRow::new("voltage", "V", &stats.statistics.voltage),
                StatsRow::new("temperature", "°C", &stats.statistics.temperature),
            ];
            print_table(&rows);
        }
    }

    Ok(())
}
