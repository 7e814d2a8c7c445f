//! Decoding for the base64 overlay image an MRI prediction may carry.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::DynamicImage;
use tracing::info;

use crate::error::PredictError;

/// Decode a base64 overlay payload into raw image bytes.
///
/// # Errors
/// - Payload is not valid base64
/// - Payload decodes to zero bytes
pub fn decode_overlay(encoded: &str) -> Result<Vec<u8>, PredictError> {
    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
        PredictError::MalformedResponse(format!("Overlay is not valid base64: {}", e))
    })?;
    if bytes.is_empty() {
        return Err(PredictError::MalformedResponse(
            "Overlay payload is empty".to_string(),
        ));
    }
    info!("Decoded overlay: {} bytes", bytes.len());
    Ok(bytes)
}

/// Load decoded overlay bytes as an image. The backend sends JPEG or PNG
/// heatmaps; anything undecodable is reported, not displayed.
pub fn load_overlay_image(bytes: &[u8]) -> Result<DynamicImage, PredictError> {
    image::load_from_memory(bytes).map_err(|e| {
        PredictError::MalformedResponse(format!("Overlay bytes are not a decodable image: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::ImageFormat;

    use super::*;

    fn png_fixture() -> Vec<u8> {
        let img = DynamicImage::new_rgb8(16, 16);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_overlay_round_trip() {
        let png = png_fixture();
        let encoded = STANDARD.encode(&png);

        let decoded = decode_overlay(&encoded).unwrap();
        assert_eq!(decoded, png);

        let img = load_overlay_image(&decoded).unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 16);
    }

    #[test]
    fn test_decode_overlay_rejects_invalid_base64() {
        let result = decode_overlay("not!!valid@@base64");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base64"));
    }

    #[test]
    fn test_decode_overlay_rejects_empty_payload() {
        let result = decode_overlay("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_load_overlay_image_rejects_non_image() {
        let result = load_overlay_image(b"plain text, not pixels");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("decodable image"));
    }

    #[test]
    fn test_decode_overlay_trims_whitespace() {
        let encoded = format!("  {}\n", STANDARD.encode(b"overlay"));
        let decoded = decode_overlay(&encoded).unwrap();
        assert_eq!(decoded, b"overlay");
    }
}
