//! API client for communicating with the equipment monitor service

use anyhow::{Context, Result};
use monitor_lib::{anomaly::Alert, AnalysisResult, SampleInput, WindowStats};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// API client for the monitor service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        parse_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        parse_response(response).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.get("health").await
    }

    pub async fn analyze(&self, sample: &SampleInput) -> Result<AnalysisResult> {
        self.post("analyze", sample).await
    }

    pub async fn alerts(&self) -> Result<AlertList> {
        self.get("alerts").await
    }

    pub async fn stats(&self) -> Result<WindowStats> {
        self.get("stats").await
    }
}

/// Decode a successful body, or surface the service's `{"error": ...}` message
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        anyhow::bail!("API error ({}): {}", status, message);
    }

    response.json().await.context("Failed to parse response")
}

// API response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertList {
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"healthy","model_ready":true}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health = client.health().await.unwrap();

        mock.assert_async().await;
        assert_eq!(health.status, "healthy");
        assert!(health.model_ready);
    }

    #[tokio::test]
    async fn test_analyze_posts_only_given_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_body(Matcher::Json(serde_json::json!({ "current": 3.0 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "health_score": 92.5,
                    "is_anomaly": false,
                    "anomaly_score": 0.0,
                    "trend": 0.0,
                    "failure_prediction": {"hours_to_failure": 30.1, "confidence": 0.75},
                    "alerts": [{
                        "severity": "critical",
                        "kind": "overcurrent",
                        "message": "Overcurrent: 3.00A exceeds 2.50A limit",
                        "timestamp": 1700000000000.0
                    }],
                    "data_points_analyzed": 1
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let sample = SampleInput {
            current: Some(3.0),
            ..Default::default()
        };
        let result = client.analyze(&sample).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.health_score, 92.5);
        assert_eq!(result.alerts.len(), 1);
        assert_eq!(result.failure_prediction.hours_to_failure, Some(30.1));
    }

    #[tokio::test]
    async fn test_error_message_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stats")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"No data available"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.stats().await.unwrap_err().to_string();

        assert!(err.contains("404"));
        assert!(err.ends_with("No data available"));
    }

    #[tokio::test]
    async fn test_alerts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/alerts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"alerts":[{"severity":"warning","kind":"voltage_low","message":"Voltage low: 4.50V","timestamp":1.0}]}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let alerts = client.alerts().await.unwrap();

        assert_eq!(alerts.alerts.len(), 1);
        assert_eq!(alerts.alerts[0].message, "Voltage low: 4.50V");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
