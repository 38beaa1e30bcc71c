//! Decoding of base64 image payloads sent by the browser.
//!
//! Payloads arrive either as a bare base64 string or as a data URL
//! (`data:image/png;base64,...`).

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// Content type assumed when the payload carries no data-URL prefix.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Standard alphabet, padding optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Raw image bytes ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Strip an optional `data:image/<subtype>;base64,` prefix and decode the rest.
pub fn decode_image_payload(payload: &str) -> Result<DecodedImage, base64::DecodeError> {
    let (content_type, encoded) = match split_data_url(payload) {
        Some((subtype, rest)) => (format!("image/{subtype}"), rest),
        None => (DEFAULT_CONTENT_TYPE.to_string(), payload),
    };

    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT.decode(compact.as_bytes())?;

    Ok(DecodedImage { bytes, content_type })
}

/// Returns `(subtype, base64 data)` when `payload` starts with an image data-URL prefix.
fn split_data_url(payload: &str) -> Option<(&str, &str)> {
    let rest = payload.strip_prefix("data:image/")?;
    let (subtype, data) = rest.split_once(";base64,")?;

    let valid = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.'));
    valid.then_some((subtype, data))
}
