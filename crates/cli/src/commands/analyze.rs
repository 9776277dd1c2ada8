//! Commands that submit telemetry for analysis

use anyhow::{Context, Result};
use colored::Colorize;
use monitor_lib::{AnalysisResult, SampleInput};
use std::path::Path;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{
    color_flag, color_health_score, color_severity, format_hours, print_json, print_success,
    print_table, OutputFormat,
};

/// One summary row per replayed sample
#[derive(Tabled)]
struct ReplayRow {
    #[tabled(rename = "#")]
    line: usize,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Voltage")]
    voltage: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Anomaly")]
    anomaly: String,
    #[tabled(rename = "Failure In")]
    failure_in: String,
    #[tabled(rename = "Alerts")]
    alerts: usize,
}

fn field(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

/// Analyse a single reading
pub async fn analyze(client: &ApiClient, sample: SampleInput, format: OutputFormat) -> Result<()> {
    let result = client.analyze(&sample).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_result(&result),
    }

    Ok(())
}

fn print_result(result: &AnalysisResult) {
    println!("{}", "Health Analysis".bold());
    println!("{}", "=".repeat(50));
    println!(
        "Health score:           {}",
        color_health_score(result.health_score)
    );
    println!("Anomaly:                {}", color_flag(result.is_anomaly));
    println!("Anomaly score:          {:.4}", result.anomaly_score);
    println!("Trend:                  {:+.3}", result.trend);
    println!(
        "Failure predicted in:   {} (confidence {:.0}%)",
        format_hours(result.failure_prediction.hours_to_failure),
        result.failure_prediction.confidence * 100.0
    );
    println!("Data points analysed:   {}", result.data_points_analyzed);

    if result.alerts.is_empty() {
        println!();
        print_success("No alerts");
        return;
    }

    println!();
    println!("{}", "Alerts".bold());
    println!("{}", "-".repeat(50));
    for alert in &result.alerts {
        println!("[{}] {}", color_severity(alert.severity), alert.message);
    }
}

/// Parse newline-delimited JSON samples, skipping blank lines
///
/// Returns `(line number, sample)` pairs, numbering lines from 1.
pub fn parse_samples(content: &str) -> Result<Vec<(usize, SampleInput)>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let sample = serde_json::from_str(line)
                .with_context(|| format!("Invalid sample on line {}", idx + 1))?;
            Ok((idx + 1, sample))
        })
        .collect()
}

/// Post every sample of a file in order and summarise each result
pub async fn replay(client: &ApiClient, path: &Path, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let samples = parse_samples(&content)?;

    let mut rows = Vec::with_capacity(samples.len());
    let mut results = Vec::with_capacity(samples.len());
    for (line, sample) in samples {
        let result = client
            .analyze(&sample)
            .await
            .with_context(|| format!("Analysis failed for line {}", line))?;

        rows.push(ReplayRow {
            line,
            current: field(sample.current),
            voltage: field(sample.voltage),
            temperature: field(sample.temperature),
            health: color_health_score(result.health_score),
            anomaly: color_flag(result.is_anomaly),
            failure_in: format_hours(result.failure_prediction.hours_to_failure),
            alerts: result.alerts.len(),
        });
        results.push(result);
    }

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Table => {
            print_table(&rows);
            let anomalies = results.iter().filter(|r| r.is_anomaly).count();
            let alerts: usize = results.iter().map(|r| r.alerts.len()).sum();
            println!(
                "Replayed {} samples: {} anomalous, {} alerts",
                results.len(),
                anomalies,
                alerts
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_samples_skips_blank_lines() {
        let content = "{\"current\": 1.0}\n\n{\"voltage\": 4.5, \"temperature\": 27.0}\n";
        let samples = parse_samples(content).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].0, 1);
        assert_eq!(samples[0].1.current, Some(1.0));
        assert_eq!(samples[1].0, 3);
        assert_eq!(samples[1].1.voltage, Some(4.5));
    }

    #[test]
    fn test_parse_samples_reports_line() {
        let err = parse_samples("{}\n{oops}\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[tokio::test]
    async fn test_replay_posts_each_sample_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "health_score": 100.0,
                    "is_anomaly": false,
                    "anomaly_score": 0.0,
                    "trend": 0.0,
                    "failure_prediction": {"hours_to_failure": 40.0, "confidence": 0.75},
                    "alerts": [],
                    "data_points_analyzed": 1
                }"#,
            )
            .expect(3)
            .create_async()
            .await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"current\": 1.0}}").unwrap();
        writeln!(file, "{{\"current\": 1.1}}").unwrap();
        writeln!(file, "{{\"current\": 1.2}}").unwrap();

        let client = ApiClient::new(&server.url()).unwrap();
        replay(&client, file.path(), OutputFormat::Json).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_replay_missing_file() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let err = replay(&client, Path::new("/nonexistent/samples.ndjson"), OutputFormat::Table)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
