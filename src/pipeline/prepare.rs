//! Image preparation: decode, downscale, JPEG-encode, base64-wrap.
//!
//! ## Why downscale and recompress?
//!
//! Card photos straight off a phone camera run 3–12 MB; the extraction
//! service neither needs nor rewards that resolution. Capping the width at
//! [`MAX_WIDTH`] and re-encoding as JPEG at [`JPEG_QUALITY`] cuts upload
//! size (and with it latency and token cost) by an order of magnitude while
//! keeping card text comfortably legible to the model. Narrow sources are
//! never upscaled — interpolation adds pixels, not information.
//!
//! ## Why spawn_blocking?
//!
//! Decoding and re-encoding a multi-megapixel image is CPU-bound work;
//! `tokio::task::spawn_blocking` keeps it off the async worker threads.

use crate::error::ScanError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on the prepared image width. Wider sources are scaled down
/// by a uniform factor; narrower sources pass through unchanged.
pub const MAX_WIDTH: u32 = 1024;

/// Fixed JPEG re-encoding quality (1–100).
pub const JPEG_QUALITY: u8 = 70;

/// MIME type of every prepared payload.
pub const PREPARED_MIME_TYPE: &str = "image/jpeg";

/// A transport-ready extraction payload: raw base64 with no data-URI prefix.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Base64-encoded JPEG bytes.
    pub data: String,
    /// Always [`PREPARED_MIME_TYPE`]; carried so the request builder never
    /// has to guess.
    pub mime_type: &'static str,
    /// Width after scaling.
    pub width: u32,
    /// Height after scaling.
    pub height: u32,
    /// Source dimensions before scaling.
    pub source_width: u32,
    pub source_height: u32,
    /// JPEG byte length before base64 expansion.
    pub encoded_len: usize,
}

/// Prepare an image file for extraction.
pub async fn prepare_file(path: impl AsRef<Path>) -> Result<PreparedImage, ScanError> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ScanError::DecodeError {
            path: path.clone(),
            detail: e.to_string(),
        })?;
    prepare_bytes(bytes, path).await
}

/// Prepare in-memory image bytes for extraction.
///
/// `origin` labels error messages; callers without a real path pass
/// something descriptive like `"<memory>"`.
pub async fn prepare_bytes(
    bytes: Vec<u8>,
    origin: impl Into<PathBuf>,
) -> Result<PreparedImage, ScanError> {
    let origin = origin.into();
    tokio::task::spawn_blocking(move || prepare_blocking(&bytes, &origin))
        .await
        .map_err(|e| ScanError::Internal(format!("image preparation task panicked: {e}")))?
}

/// Blocking implementation of the preparation stage.
fn prepare_blocking(bytes: &[u8], origin: &Path) -> Result<PreparedImage, ScanError> {
    let source = image::load_from_memory(bytes).map_err(|e| ScanError::DecodeError {
        path: origin.to_path_buf(),
        detail: e.to_string(),
    })?;

    let (source_w, source_h) = (source.width(), source.height());
    let (width, height) = scaled_dimensions(source_w, source_h);

    let scaled = if (width, height) == (source_w, source_h) {
        source
    } else {
        source.resize_exact(width, height, image::imageops::FilterType::Triangle)
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());

    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        &mut Cursor::new(&mut buf),
        JPEG_QUALITY,
    ))
    .map_err(|e| ScanError::Internal(format!("JPEG encoding failed: {e}")))?;

    let encoded_len = buf.len();
    let data = STANDARD.encode(&buf);
    debug!(
        "Prepared image {}x{} → {}x{}, {} bytes JPEG",
        source_w, source_h, width, height, encoded_len
    );

    Ok(PreparedImage {
        data,
        mime_type: PREPARED_MIME_TYPE,
        width,
        height,
        source_width: source_w,
        source_height: source_h,
        encoded_len,
    })
}

/// Target dimensions for a source image: uniform downscale to [`MAX_WIDTH`],
/// never upscale.
fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_WIDTH {
        return (width, height);
    }
    let factor = MAX_WIDTH as f64 / width as f64;
    let scaled_height = (height as f64 * factor).round().max(1.0) as u32;
    (MAX_WIDTH, scaled_height)
}
