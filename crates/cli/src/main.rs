//! Equipment Health Monitor CLI
//!
//! A command-line tool for checking service health, submitting telemetry,
//! and viewing alerts and statistics of the equipment monitor.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analyze, status};
use monitor_lib::SampleInput;
use std::path::PathBuf;

/// Equipment Health Monitor CLI
#[derive(Parser)]
#[command(name = "hmctl")]
#[command(author, version, about = "CLI for the Equipment Health Monitor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via HMCTL_API_URL env var)
    #[arg(long, env = "HMCTL_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check service health and model readiness
    Health,

    /// Analyse a single reading (omitted fields use service defaults)
    Analyze {
        /// Current in amperes
        #[arg(long)]
        current: Option<f64>,

        /// Voltage in volts
        #[arg(long)]
        voltage: Option<f64>,

        /// Temperature in °C
        #[arg(long)]
        temperature: Option<f64>,

        /// Timestamp in epoch milliseconds
        #[arg(long)]
        timestamp: Option<f64>,
    },

    /// Show the most recent alerts
    Alerts,

    /// Show statistics over recent telemetry
    Stats,

    /// Post newline-delimited JSON samples from a file, in order
    Replay {
        /// File with one JSON sample per line
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Health => status::show_health(&client, cli.format).await?,
        Commands::Analyze {
            current,
            voltage,
            temperature,
            timestamp,
        } => {
            let sample = SampleInput {
                current,
                voltage,
                temperature,
                timestamp,
            };
            analyze::analyze(&client, sample, cli.format).await?;
        }
        Commands::Alerts => status::show_alerts(&client, cli.format).await?,
        Commands::Stats => status::show_stats(&client, cli.format).await?,
        Commands::Replay { file } => analyze::replay(&client, &file, cli.format).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_partial_fields() {
        let cli = Cli::try_parse_from(["hmctl", "analyze", "--current", "3.0", "--voltage", "4.5"])
            .unwrap();
        match cli.command {
            Commands::Analyze {
                current,
                voltage,
                temperature,
                timestamp,
            } => {
                assert_eq!(current, Some(3.0));
                assert_eq!(voltage, Some(4.5));
                assert!(temperature.is_none());
                assert!(timestamp.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from([
            "hmctl",
            "--api-url",
            "http://monitor:5000",
            "--format",
            "json",
            "stats",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://monitor:5000");
        assert_eq!(cli.format, output::OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn test_replay_requires_file() {
        assert!(Cli::try_parse_from(["hmctl", "replay"]).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_reading() {
        assert!(Cli::try_parse_from(["hmctl", "analyze", "--current", "high"]).is_err());
    }
}
