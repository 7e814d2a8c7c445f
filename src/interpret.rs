//! Maps backend JSON replies (or transport failures) to a normalized
//! [`PredictionResult`].

use image::DynamicImage;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{truncate_body, PredictError, TransportError};
use crate::overlay::{decode_overlay, load_overlay_image};
use crate::upload::UploadKind;

/// Class label substituted when the backend cannot be reached at all.
pub const FALLBACK_CLASS: &str = "Fatigued";
/// Confidence substituted alongside [`FALLBACK_CLASS`].
pub const FALLBACK_CONFIDENCE: f64 = 0.87;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Ok,
    Offline,
    Error,
}

/// Normalized prediction record handed to the presentation layer.
///
/// `Offline` status means `class_label`/`confidence` hold the fixed demo
/// values, never real inference output; callers must flag such results as
/// demo data. `confidence` is always a fraction in [0,1] (display formatting
/// is the caller's concern).
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    pub class_label: Option<String>,
    pub confidence: Option<f64>,
    pub backend_status: BackendStatus,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Vec<u8>>,
}

impl PredictionResult {
    /// Whether this result is the offline demo substitute rather than real
    /// inference output.
    pub fn is_demo(&self) -> bool {
        self.backend_status == BackendStatus::Offline
    }

    /// Decode the overlay bytes into an image, if an overlay was returned.
    pub fn overlay_image(&self) -> Option<Result<DynamicImage, PredictError>> {
        self.overlay.as_deref().map(load_overlay_image)
    }
}

/// Interpret a transport outcome for the given upload kind.
///
/// Only a network-level failure is masked with the demo payload; HTTP errors
/// and malformed 2xx bodies surface explicitly so the caller never mistakes
/// them for inference output.
pub fn interpret(
    outcome: Result<Value, TransportError>,
    kind: UploadKind,
) -> Result<PredictionResult, PredictError> {
    match outcome {
        Ok(body) => match kind {
            UploadKind::Eeg => interpret_eeg(&body),
            UploadKind::Mri => interpret_mri(&body),
        },
        Err(TransportError::Http { status, body }) => {
            warn!("Backend rejected request with HTTP {}", status);
            Ok(PredictionResult {
                class_label: None,
                confidence: None,
                backend_status: BackendStatus::Error,
                message: Some(format!(
                    "Backend error: HTTP {} - {}",
                    status,
                    truncate_body(&body, 300)
                )),
                overlay: None,
            })
        }
        Err(TransportError::Network(reason)) => {
            warn!("Backend unreachable ({}), substituting demo prediction", reason);
            Ok(PredictionResult {
                class_label: Some(FALLBACK_CLASS.to_string()),
                confidence: Some(FALLBACK_CONFIDENCE),
                backend_status: BackendStatus::Offline,
                message: Some("Backend is offline, showing demo prediction instead.".to_string()),
                overlay: None,
            })
        }
    }
}

fn interpret_eeg(body: &Value) -> Result<PredictionResult, PredictError> {
    // The backend usually sends the class as a string code, but numeric
    // bodies have been observed; accept both.
    let raw_class = match body.get("fatigue_class") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(PredictError::MalformedResponse(
                "Missing 'fatigue_class' field in EEG prediction".to_string(),
            ))
        }
    };
    let class_label = normalize_fatigue_label(&raw_class);
    let confidence = body.get("confidence").and_then(Value::as_f64).map(clamp_confidence);

    // Some backend revisions annotate a degraded reply with their own
    // status/message pair; honor it when present.
    let backend_status = match body.get("backend_status").and_then(Value::as_str) {
        Some("offline") => BackendStatus::Offline,
        Some("error") => BackendStatus::Error,
        _ => BackendStatus::Ok,
    };
    let message = body.get("message").and_then(Value::as_str).map(str::to_string);

    info!("EEG prediction: '{}' (confidence {:?})", class_label, confidence);
    Ok(PredictionResult {
        class_label: Some(class_label),
        confidence,
        backend_status,
        message,
        overlay: None,
    })
}

fn interpret_mri(body: &Value) -> Result<PredictionResult, PredictError> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        return Err(PredictError::Backend(err.to_string()));
    }

    let prediction = body
        .get("prediction")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PredictError::MalformedResponse(
                "Missing 'prediction' field in MRI response".to_string(),
            )
        })?;
    let confidence = body.get("confidence").and_then(Value::as_f64).map(clamp_confidence);

    let overlay = match body.get("overlay").and_then(Value::as_str) {
        Some(encoded) => Some(decode_overlay(encoded)?),
        None => None,
    };

    info!(
        "MRI prediction: '{}' (confidence {:?}, overlay: {})",
        prediction,
        confidence,
        overlay.is_some()
    );
    Ok(PredictionResult {
        class_label: Some(prediction.to_string()),
        confidence,
        backend_status: BackendStatus::Ok,
        message: None,
        overlay,
    })
}

/// Map numeric fatigue class codes to display labels. Unmapped codes pass
/// through unchanged.
pub fn normalize_fatigue_label(raw: &str) -> String {
    match raw {
        "0" => "Not Fatigued".to_string(),
        "1" => "Fatigued".to_string(),
        other => other.to_string(),
    }
}

fn clamp_confidence(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
