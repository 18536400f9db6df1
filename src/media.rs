//! Image compression applied before images are staged or uploaded.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError};
use thiserror::Error;

/// Longest side of a compressed image, in pixels.
pub const MAX_DIMENSION: u32 = 1024;
/// Size compressed images aim to stay under.
pub const MAX_BYTES: usize = 1024 * 1024;

const START_QUALITY: u8 = 90;
const MIN_QUALITY: u8 = 40;
const QUALITY_STEP: u8 = 10;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Tệp không phải là hình ảnh hợp lệ")]
    Decode(#[source] ImageError),
    #[error("Không nén được hình ảnh")]
    Encode(#[source] ImageError),
}

/// Image re-encoded as JPEG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `bytes`, shrinks the image so its longest side is at most
/// [`MAX_DIMENSION`] and re-encodes it as JPEG, lowering the quality until
/// the result fits in [`MAX_BYTES`] or the quality floor is reached.
///
/// CPU bound; call it through `web::block` from request handlers.
pub fn compress_image(file_name: &str, bytes: &[u8]) -> Result<CompressedImage, MediaError> {
    let decoded = image::load_from_memory(bytes).map_err(MediaError::Decode)?;
    let (width, height) = decoded.dimensions();
    let resized = if width.max(height) > MAX_DIMENSION {
        decoded.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        decoded
    };
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut quality = START_QUALITY;
    let encoded = loop {
        let encoded = encode_jpeg(&rgb, quality)?;
        if encoded.len() <= MAX_BYTES || quality <= MIN_QUALITY {
            break encoded;
        }
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
    };

    Ok(CompressedImage {
        file_name: jpeg_file_name(file_name),
        content_type: "image/jpeg".to_string(),
        bytes: encoded,
    })
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    image
        .write_with_encoder(encoder)
        .map_err(MediaError::Encode)?;
    Ok(buffer.into_inner())
}

/// Strips path separators and swaps the extension for `.jpg`.
fn jpeg_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| *c != '\0')
        .take(200)
        .collect::<String>();
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base,
    };
    if stem.trim().is_empty() {
        "image.jpg".to_string()
    } else {
        format!("{stem}.jpg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([20, 120, 200, 255]),
        ));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn large_images_are_scaled_to_longest_side() {
        let compressed = compress_image("photo.png", &png(2048, 1024)).unwrap();
        assert_eq!(compressed.content_type, "image/jpeg");
        assert_eq!(compressed.file_name, "photo.jpg");
        assert!(compressed.bytes.len() <= MAX_BYTES);
        let decoded = image::load_from_memory(&compressed.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1024, 512));
    }

    #[test]
    fn small_images_keep_their_size() {
        let compressed = compress_image("a.png", &png(300, 200)).unwrap();
        let decoded = image::load_from_memory(&compressed.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = compress_image("x.jpg", b"not an image").unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn file_names_lose_paths_and_extensions() {
        assert_eq!(jpeg_file_name("C:\\Users\\me\\IMG_1.HEIC"), "IMG_1.jpg");
        assert_eq!(jpeg_file_name("../../etc/passwd"), "passwd.jpg");
        assert_eq!(jpeg_file_name(""), "image.jpg");
        assert_eq!(jpeg_file_name(".hidden"), ".hidden.jpg");
    }
}
