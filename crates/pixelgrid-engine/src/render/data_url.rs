//! PNG data-URL codec for surface snapshots.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};

use crate::error::SnapshotError;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes straight-alpha RGBA8 pixels as a PNG data URL.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> Result<String, SnapshotError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(rgba, width, height, ExtendedColorType::Rgba8)?;

    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(&png, &mut url);
    Ok(url)
}

/// Decodes a PNG data URL into `(width, height, rgba)`.
pub fn decode_png(url: &str) -> Result<(u32, u32, Vec<u8>), SnapshotError> {
    let payload = url
        .trim()
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(SnapshotError::NotDataUrl)?;
    let bytes = STANDARD.decode(payload)?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok((w, h, img.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_png_prefix() {
        let url = encode_png(2, 1, &[255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));
        let (w, h, px) = decode_png(&url).unwrap();
        assert_eq!((w, h), (2, 1));
        assert_eq!(px, [255, 0, 0, 255, 0, 0, 255, 128]);
    }

    #[test]
    fn rejects_foreign_urls() {
        assert!(matches!(decode_png("data:image/jpeg;base64,AAAA"), Err(SnapshotError::NotDataUrl)));
        assert!(matches!(decode_png("data:image/png;base64,***"), Err(SnapshotError::Base64(_))));
        assert!(matches!(decode_png("data:image/png;base64,AAAA"), Err(SnapshotError::Image(_))));
    }
}
