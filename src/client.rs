use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{error, info, warn};

use crate::config::BackendConfig;
use crate::error::{truncate_body, PredictError, TransportError};
use crate::interpret::{interpret, PredictionResult};
use crate::upload::{UploadRequest, OCTET_STREAM};

/// Default per-request timeout. Inference on a cold backend can take close to
/// two minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Short timeout for the liveness probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Liveness report from `GET /health`. `Offline` covers every failure mode:
/// non-200 status, unparseable body, or no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    /// Status string the backend reported, normally `"ok"`.
    Reported(String),
    Offline,
}

impl BackendHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self, BackendHealth::Reported(s) if s == "ok")
    }
}

/// HTTP client for the inference backend.
///
/// Cheap to clone and holds no mutable state, so successive or concurrent
/// submissions are fully independent. Each [`submit`](Self::submit) issues
/// exactly one attempt; the timeout is the only cancellation mechanism.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl PredictClient {
    /// Build a client with the default 120 s request timeout.
    pub fn new(config: BackendConfig) -> Result<Self, PredictError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Build a client with an explicit request timeout.
    pub fn with_timeout(config: BackendConfig, timeout: Duration) -> Result<Self, PredictError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Submit a file for prediction and return the parsed JSON body.
    ///
    /// Builds a multipart form with a single file field (named per
    /// [`UploadKind`](crate::upload::UploadKind)), attaches the bearer token,
    /// and POSTs it. One attempt, no retry.
    ///
    /// # Errors
    /// - [`TransportError::Http`] when the backend answers with a non-2xx
    ///   status (carries status code and body text)
    /// - [`TransportError::Network`] when no response is obtained at all
    pub async fn submit(
        &self,
        request: &UploadRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let url = self.config.endpoint(request.kind().endpoint_path());
        info!(
            "Submitting '{}' ({} bytes, {}) to {}",
            request.file_name(),
            request.bytes().len(),
            request.mime_type(),
            url
        );

        // An unparseable mime type falls back to the part's default
        // (application/octet-stream) rather than failing the request, so no
        // internal error can read as backend unreachability.
        let part = Part::bytes(request.bytes().to_vec())
            .file_name(request.file_name().to_string());
        let part = match part.mime_str(request.mime_type()) {
            Ok(p) => p,
            Err(_) => {
                warn!(
                    "Mime type '{}' is not parseable, sending as {}",
                    request.mime_type(),
                    OCTET_STREAM
                );
                Part::bytes(request.bytes().to_vec())
                    .file_name(request.file_name().to_string())
            }
        };
        let form = Form::new().part(request.kind().field_name(), part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.token())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    format!("Request to {} timed out", url)
                } else if e.is_connect() {
                    format!("Could not connect to {}: {}", url, e)
                } else {
                    format!("Request to {} failed: {}", url, e)
                };
                warn!("{}", msg);
                TransportError::Network(msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            error!(
                "Backend rejected '{}' with {}: {}",
                request.file_name(),
                status,
                truncate_body(&body, 1024)
            );
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            TransportError::Network(format!("Failed to read response body from {}: {}", url, e))
        })?;

        // A 2xx body that is not JSON is reported like a bad status, never as
        // a network failure, so it cannot trigger the demo fallback.
        serde_json::from_str(&body).map_err(|e| {
            error!("Backend returned 2xx with non-JSON body: {}", e);
            TransportError::Http {
                status: status.as_u16(),
                body: format!("Response body was not valid JSON: {}", e),
            }
        })
    }

    /// Submit a file and interpret the outcome in one step.
    pub async fn predict(&self, request: &UploadRequest) -> Result<PredictionResult, PredictError> {
        let outcome = self.submit(request).await;
        interpret(outcome, request.kind())
    }

    /// Probe the backend liveness endpoint.
    ///
    /// Never fails: anything other than a 200 with a parseable `status` field
    /// reads as [`BackendHealth::Offline`].
    pub async fn health(&self) -> BackendHealth {
        let url = self.config.endpoint("/health");
        let response = match self
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Health probe failed: {}", e);
                return BackendHealth::Offline;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            warn!("Health probe returned {}", response.status());
            return BackendHealth::Offline;
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => match body.get("status").and_then(|s| s.as_str()) {
                Some(status) => {
                    info!("Backend health: {}", status);
                    BackendHealth::Reported(status.to_string())
                }
                None => {
                    warn!("Health response missing 'status' field");
                    BackendHealth::Offline
                }
            },
            Err(e) => {
                warn!("Health response was not JSON: {}", e);
                BackendHealth::Offline
            }
        }
    }
}
