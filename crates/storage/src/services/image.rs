use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Upper bound for a decoded avatar upload
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

        if bytes.starts_with(PNG) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG) {
            Some(Self::Jpeg)
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image is empty")]
    Empty,

    #[error("Image must be base64 encoded")]
    InvalidEncoding,

    #[error("Image is larger than {max} bytes")]
    TooLarge { max: usize },

    #[error("Only PNG, JPEG and WebP images are supported")]
    UnsupportedFormat,
}

/// Decode a base64 image upload, optionally wrapped in a `data:` URL.
///
/// The size limit applies to the decoded bytes; payloads that cannot possibly
/// fit are rejected before decoding.
pub fn decode_image(payload: &str, max_bytes: usize) -> Result<DecodedImage, ImageError> {
    let encoded = match payload.trim().strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or(ImageError::InvalidEncoding)?,
        None => payload.trim(),
    };

    if encoded.is_empty() {
        return Err(ImageError::Empty);
    }

    if encoded.len() / 4 * 3 > max_bytes + 3 {
        return Err(ImageError::TooLarge { max: max_bytes });
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| ImageError::InvalidEncoding)?;

    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge { max: max_bytes });
    }

    let format = ImageFormat::sniff(&bytes).ok_or(ImageError::UnsupportedFormat)?;

    Ok(DecodedImage { format, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn test_decodes_png_payload() {
        let payload = STANDARD.encode(PNG_HEADER);
        let image = decode_image(&payload, MAX_AVATAR_BYTES).unwrap();
        assert_eq!(image.format, ImageFormat::Png);
        assert_eq!(image.bytes, PNG_HEADER);
    }

    #[test]
    fn test_accepts_data_url() {
        let payload = format!("data:image/jpeg;base64,{}", STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]));
        let image = decode_image(&payload, MAX_AVATAR_BYTES).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.format.extension(), "jpg");
    }

    #[test]
    fn test_detects_webp() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBPVP8 ");
        let image = decode_image(&STANDARD.encode(&bytes), MAX_AVATAR_BYTES).unwrap();
        assert_eq!(image.format, ImageFormat::Webp);
    }

    #[test]
    fn test_rejects_oversized_image() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(64, 0);
        let payload = STANDARD.encode(&bytes);
        assert_eq!(
            decode_image(&payload, 32).unwrap_err(),
            ImageError::TooLarge { max: 32 }
        );
    }

    #[test]
    fn test_avatar_limit_is_inclusive() {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(MAX_AVATAR_BYTES, 0);

        let image = decode_image(&STANDARD.encode(&bytes), MAX_AVATAR_BYTES).unwrap();
        assert_eq!(image.bytes.len(), MAX_AVATAR_BYTES);

        bytes.push(0);
        assert_eq!(
            decode_image(&STANDARD.encode(&bytes), MAX_AVATAR_BYTES).unwrap_err(),
            ImageError::TooLarge {
                max: MAX_AVATAR_BYTES
            }
        );
    }

    #[test]
    fn test_rejects_unknown_format() {
        let payload = STANDARD.encode(b"GIF89a-not-allowed");
        assert_eq!(
            decode_image(&payload, MAX_AVATAR_BYTES).unwrap_err(),
            ImageError::UnsupportedFormat
        );
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert_eq!(
            decode_image("not base64!!", MAX_AVATAR_BYTES).unwrap_err(),
            ImageError::InvalidEncoding
        );
        assert_eq!(decode_image("   ", MAX_AVATAR_BYTES).unwrap_err(), ImageError::Empty);
    }
}
