//! Client library for the NeuroCheck inference backend.
//!
//! Submits EEG signal files (CSV) or MRI images (JPEG/PNG) to a remote
//! classifier as a multipart HTTP upload and normalizes the JSON reply into
//! a [`PredictionResult`]. When the backend is unreachable, the interpreter
//! substitutes a fixed demo prediction flagged as
//! [`BackendStatus::Offline`], so a demo frontend always has something to
//! display; HTTP and malformed-response failures surface explicitly.
//!
//! ```no_run
//! use neurocheck_client::{BackendConfig, PredictClient, UploadKind, UploadRequest};
//!
//! # async fn run() -> Result<(), neurocheck_client::PredictError> {
//! let config = BackendConfig::new("https://backend.example.com", "token")?;
//! let client = PredictClient::new(config)?;
//! let request = UploadRequest::from_path("session.csv", UploadKind::Eeg)?;
//! let result = client.predict(&request).await?;
//! if result.is_demo() {
//!     eprintln!("backend offline, demo prediction shown");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod interpret;
pub mod overlay;
pub mod upload;

pub use client::{BackendHealth, PredictClient, DEFAULT_TIMEOUT, HEALTH_TIMEOUT};
pub use config::BackendConfig;
pub use error::{PredictError, TransportError};
pub use interpret::{
    interpret, BackendStatus, PredictionResult, FALLBACK_CLASS, FALLBACK_CONFIDENCE,
};
pub use upload::{UploadKind, UploadRequest};
