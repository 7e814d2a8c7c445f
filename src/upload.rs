use std::path::Path;

use crate::error::PredictError;

/// Mime type used when the caller supplies none or the extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Which classifier a file is destined for. Each kind owns its endpoint path
/// and the multipart field name the backend reads the file from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// EEG time-series CSV, classified for fatigue.
    Eeg,
    /// MRI image (JPEG/PNG), classified for Alzheimer's.
    Mri,
}

impl UploadKind {
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            UploadKind::Eeg => "/predict/eeg",
            UploadKind::Mri => "/predict/alzheimers",
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            UploadKind::Eeg => "eeg_file",
            UploadKind::Mri => "file",
        }
    }
}

/// A validated file payload ready for submission.
///
/// Constructed once at the boundary; the transport layer can assume the
/// invariants hold (non-empty name and bytes, non-empty mime type). Discarded
/// after the request completes.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    kind: UploadKind,
}

impl UploadRequest {
    /// Validate and wrap an in-memory file payload.
    ///
    /// # Errors
    /// - Empty file name
    /// - Empty file contents (rejected here, before any network call)
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
        kind: UploadKind,
    ) -> Result<Self, PredictError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(PredictError::Validation(
                "Uploaded file must have a name".to_string(),
            ));
        }
        if bytes.is_empty() {
            return Err(PredictError::Validation(format!(
                "Uploaded file '{}' is empty",
                file_name
            )));
        }

        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            OCTET_STREAM.to_string()
        } else {
            mime_type
        };

        Ok(Self {
            file_name,
            mime_type,
            bytes,
            kind,
        })
    }

    /// Read a file from disk, guessing the mime type from its extension.
    pub fn from_path(path: impl AsRef<Path>, kind: UploadKind) -> Result<Self, PredictError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                PredictError::Validation(format!("Path has no file name: {}", path.display()))
            })?;
        let bytes = std::fs::read(path).map_err(|e| {
            PredictError::Validation(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::new(file_name, guess_mime(path), bytes, kind)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> UploadKind {
        self.kind
    }
}

/// Map a file extension to the mime type the backend expects.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => "text/csv",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => OCTET_STREAM,
    }
}
