//! HTTP client for the exchange-gap endpoint.

use async_trait::async_trait;
use chrono::Local;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::config::REQUEST_TIMEOUT;
use crate::error::AcquisitionError;
use crate::models::snapshot::MarketSnapshot;
use crate::services::market_data::SnapshotSource;

pub const OBSERVED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Response body as served by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GapPayload {
    pub analisis: Option<GapAnalysis>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Rates and spread. Only `brecha_porcentaje` is required; the other fields
/// are display values passed through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct GapAnalysis {
    #[serde(default)]
    pub precio_pivote_bcv: Option<Value>,
    #[serde(default)]
    pub precio_paralelo_usdt: Option<Value>,
    #[serde(default)]
    pub brecha_bs: Option<Value>,
    #[serde(default)]
    pub brecha_porcentaje: Option<Value>,
}

impl GapPayload {
    /// Build a snapshot, stamping it locally when the source sends no timestamp.
    pub fn into_snapshot(self) -> Result<MarketSnapshot, AcquisitionError> {
        let analysis = self.analisis.ok_or_else(|| {
            AcquisitionError::MalformedPayload("missing 'analisis' object".to_string())
        })?;

        let gap_percent = analysis
            .brecha_porcentaje
            .as_ref()
            .and_then(display_value)
            .ok_or_else(|| {
                AcquisitionError::MalformedPayload("missing 'brecha_porcentaje'".to_string())
            })?;

        let observed_at = self
            .timestamp
            .as_ref()
            .and_then(display_value)
            .unwrap_or_else(|| Local::now().format(OBSERVED_AT_FORMAT).to_string());

        Ok(MarketSnapshot::new(
            opaque(analysis.precio_pivote_bcv.as_ref()),
            opaque(analysis.precio_paralelo_usdt.as_ref()),
            opaque(analysis.brecha_bs.as_ref()),
            gap_percent,
            observed_at,
        ))
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn opaque(value: Option<&Value>) -> String {
    value.and_then(display_value).unwrap_or_else(|| "--".to_string())
}

/// Live snapshot source backed by reqwest.
#[derive(Debug, Clone)]
pub struct GapApiClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for GapApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GapApiClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), REQUEST_TIMEOUT)
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_body(&self, endpoint: &str) -> Result<Vec<u8>, AcquisitionError> {
        let response = self
            .client
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::HttpStatus(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SnapshotSource for GapApiClient {
    async fn fetch_snapshot(&self, endpoint: &str) -> Result<MarketSnapshot, AcquisitionError> {
        debug!(endpoint = %endpoint, "GapApiClient: requesting snapshot");

        // Dropping the request future on expiry cancels it.
        let body = match tokio::time::timeout(self.timeout, self.fetch_body(endpoint)).await {
            Ok(body) => body?,
            Err(_) => {
                warn!(
                    endpoint = %endpoint,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "GapApiClient: request timed out"
                );
                return Err(AcquisitionError::Timeout);
            }
        };

        let payload: GapPayload = serde_json::from_slice(&body)
            .map_err(|e| AcquisitionError::MalformedPayload(e.to_string()))?;
        let snapshot = payload.into_snapshot()?;

        debug!(
            gap = %snapshot.gap_percent,
            state = %snapshot.state,
            "GapApiClient: snapshot parsed"
        );
        Ok(snapshot)
    }
}
