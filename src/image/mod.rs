//! Client-side image processing pipeline.
//!
//! Turns user-selected image files into upload-ready JPEG payloads inside a
//! bounded size envelope:
//!
//! 1. **Validate** - MIME type and input size checks, collected per file.
//! 2. **Compress** - decode, scale down to at most 1200x800 preserving
//!    aspect ratio, re-encode as JPEG at quality 0.85 with one quality-0.6
//!    retry if the result overshoots 500 KB. The retry result is accepted
//!    regardless of size.
//! 3. **Rename** - collision-resistant `timeline-<millis>-<rand>.<ext>`
//!    filenames.
//!
//! Batch processing runs files independently; a partial-failure batch is
//! not an overall failure.

use crate::constants::{
    IMAGE_EXTENSIONS, JPEG_QUALITY, JPEG_RETRY_QUALITY, MAX_IMAGE_HEIGHT, MAX_IMAGE_SIZE,
    MAX_IMAGE_WIDTH, MAX_UPLOAD_SIZE, SUPPORTED_IMAGE_MIMES,
};
use crate::error::{Error, Result};
use crate::utils::{compression_ratio, format_file_size};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::GenericImageView;
use image::codecs::jpeg::JpegEncoder;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of validating one input file.
///
/// Failures are collected rather than raised so a batch can report every
/// problem per file.
#[derive(Debug, Default)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    /// Returns true if the file passed every check.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A successfully processed image, ready for upload.
///
/// Never mutated after creation; consumed once by the upload step. The
/// preview file is the caller's to release via [`release_preview`].
#[derive(Debug)]
pub struct ProcessedImage {
    /// The input file this was produced from.
    pub original: PathBuf,
    /// Generated upload filename.
    pub file_name: String,
    /// Compressed JPEG bytes.
    pub data: Vec<u8>,
    /// Local preview copy of the compressed output.
    pub preview: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl ProcessedImage {
    /// Compression ratio as a percentage string with one decimal place.
    pub fn compression_ratio(&self) -> String {
        compression_ratio(self.original_size, self.compressed_size)
    }

    /// Base64 payload for transport to the remote store.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// A file that failed validation or processing.
#[derive(Debug)]
pub struct FailedImage {
    pub original: PathBuf,
    pub error: String,
}

/// Per-batch outcome: one result per input, partitioned.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub successful: Vec<ProcessedImage>,
    pub failed: Vec<FailedImage>,
}

/// Validate one input file by name and size.
///
/// Rejects unsupported MIME types and files above the input envelope
/// (5x the post-compression target). Both checks run; all failures are
/// reported together.
pub fn validate(file_name: &str, size: u64) -> Validation {
    let mut errors = Vec::new();

    let mime = mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or("application/octet-stream");
    if !SUPPORTED_IMAGE_MIMES.contains(&mime) {
        errors.push(
            Error::UnsupportedImageFormat {
                mime: mime.to_string(),
            }
            .to_string(),
        );
    }

    if size > MAX_UPLOAD_SIZE {
        errors.push(
            Error::ImageTooLarge {
                size: format_file_size(size),
                limit: format_file_size(MAX_UPLOAD_SIZE),
            }
            .to_string(),
        );
    }

    Validation { errors }
}

/// Compute output dimensions, scaling down only and preserving aspect ratio.
///
/// The width cap is applied first, then the height cap; each step scales
/// by the binding dimension and rounds.
pub fn calculate_dimensions(original_width: u32, original_height: u32) -> (u32, u32) {
    let mut width = f64::from(original_width);
    let mut height = f64::from(original_height);

    if width > f64::from(MAX_IMAGE_WIDTH) {
        height = (height * f64::from(MAX_IMAGE_WIDTH)) / width;
        width = f64::from(MAX_IMAGE_WIDTH);
    }

    if height > f64::from(MAX_IMAGE_HEIGHT) {
        width = (width * f64::from(MAX_IMAGE_HEIGHT)) / height;
        height = f64::from(MAX_IMAGE_HEIGHT);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    (width.round() as u32, height.round() as u32)
}

/// Decode, downscale, and re-encode an image as JPEG.
///
/// # Errors
///
/// Returns [`Error::Image`] if the input cannot be decoded or the output
/// cannot be encoded.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|err| Error::Image(format!("failed to decode image: {err}")))?;

    let (width, height) = img.dimensions();
    let (new_width, new_height) = calculate_dimensions(width, height);

    let img = if (new_width, new_height) != (width, height) {
        img.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();

    let encoded = encode_jpeg(&rgb, JPEG_QUALITY)?;
    if encoded.len() as u64 <= MAX_IMAGE_SIZE {
        return Ok(encoded);
    }

    // Still over the target: one retry at lower quality, accepted
    // regardless of the resulting size.
    warn!(
        size = encoded.len(),
        "first pass exceeded target, retrying at lower quality"
    );
    encode_jpeg(&rgb, JPEG_RETRY_QUALITY)
}

fn encode_jpeg(rgb: &image::RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode_image(rgb)
        .map_err(|err| Error::Image(format!("failed to encode JPEG: {err}")))?;
    Ok(out)
}

/// Generate a collision-resistant upload filename.
///
/// `timeline-<epoch-millis>-<6-char-base36>.<ext>`, where `<ext>` is the
/// original extension if recognized, else `jpg`.
pub fn generate_file_name(original_name: &str) -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let timestamp = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let random: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| "jpg".to_string());

    format!("timeline-{timestamp}-{random}.{extension}")
}

/// Process a batch of files independently.
///
/// Each input yields exactly one result. Validation or processing failure
/// of one file never aborts its siblings.
pub fn process_images(paths: &[PathBuf]) -> BatchResult {
    let mut batch = BatchResult::default();

    for path in paths {
        match process_one(path) {
            Ok(processed) => batch.successful.push(processed),
            Err(err) => batch.failed.push(FailedImage {
                original: path.clone(),
                error: err.to_string(),
            }),
        }
    }

    batch
}

fn process_one(path: &Path) -> Result<ProcessedImage> {
    let meta = fs::metadata(path)
        .map_err(|err| Error::io(format!("reading metadata of {}", path.display()), err))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let validation = validate(file_name, meta.len());
    if !validation.is_valid() {
        return Err(Error::Image(validation.errors.join(", ")));
    }

    let data =
        fs::read(path).map_err(|err| Error::io(format!("reading {}", path.display()), err))?;
    let compressed = compress(&data)?;
    let new_name = generate_file_name(file_name);

    let preview = write_preview(&new_name, &compressed)?;
    debug!(
        original = %path.display(),
        file_name = %new_name,
        original_size = meta.len(),
        compressed_size = compressed.len(),
        "processed image"
    );

    Ok(ProcessedImage {
        original: path.to_path_buf(),
        compressed_size: compressed.len() as u64,
        original_size: meta.len(),
        file_name: new_name,
        data: compressed,
        preview,
    })
}

/// Write a local preview copy for immediate feedback.
fn write_preview(file_name: &str, data: &[u8]) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(file_name);
    fs::write(&path, data)
        .map_err(|err| Error::io(format!("writing preview {}", path.display()), err))?;
    Ok(path)
}

/// Release a preview file once it is no longer displayed.
///
/// Best-effort; a missing file is not an error.
pub fn release_preview(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        warn!("failed to remove preview {}: {err}", path.display());
    }
}

/// Read a file and encode it as a base64 payload for transport.
///
/// # Errors
///
/// Returns an IO error if the file cannot be read.
pub fn file_to_base64(path: &Path) -> Result<String> {
    let data =
        fs::read(path).map_err(|err| Error::io(format!("reading {}", path.display()), err))?;
    Ok(BASE64.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_validate_accepts_2mb_jpeg() {
        let v = validate("photo.jpg", 2 * 1024 * 1024);
        assert!(v.is_valid(), "unexpected errors: {:?}", v.errors);
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let v = validate("photo.jpg", 3 * 1024 * 1024);
        assert!(!v.is_valid());
        assert!(v.errors[0].contains("too large"));
    }

    #[test]
    fn test_validate_rejects_unsupported_format() {
        let v = validate("photo.bmp", 1024);
        assert!(!v.is_valid());
        assert!(v.errors[0].contains("unsupported"));
    }

    #[test]
    fn test_validate_collects_multiple_errors() {
        let v = validate("photo.tiff", 4 * 1024 * 1024);
        assert_eq!(v.errors.len(), 2);
    }

    #[test]
    fn test_validate_reports_typed_errors() {
        let v = validate("photo.bmp", 4 * 1024 * 1024);
        assert_eq!(
            v.errors[0],
            Error::UnsupportedImageFormat {
                mime: "image/bmp".to_string(),
            }
            .to_string()
        );
        assert_eq!(
            v.errors[1],
            Error::ImageTooLarge {
                size: format_file_size(4 * 1024 * 1024),
                limit: format_file_size(MAX_UPLOAD_SIZE),
            }
            .to_string()
        );
    }

    #[test]
    fn test_calculate_dimensions() {
        // Width binds first, then height.
        assert_eq!(calculate_dimensions(2000, 1500), (1067, 800));
        // Only width over the cap.
        assert_eq!(calculate_dimensions(2400, 800), (1200, 400));
        // Only height over the cap.
        assert_eq!(calculate_dimensions(600, 1600), (300, 800));
        // Scale down only; small images pass through.
        assert_eq!(calculate_dimensions(640, 480), (640, 480));
    }

    #[test]
    fn test_compress_bounds_dimensions() {
        let compressed = compress(&png_bytes(2000, 1500)).unwrap();
        let out = image::load_from_memory(&compressed).unwrap();
        let (w, h) = out.dimensions();
        assert!(w <= 1200 && h <= 800);
        // Aspect ratio preserved within rounding.
        let original = 2000.0 / 1500.0;
        let result = f64::from(w) / f64::from(h);
        assert!((original - result).abs() < 0.01);
    }

    #[test]
    fn test_compress_keeps_small_dimensions() {
        let compressed = compress(&png_bytes(100, 50)).unwrap();
        let out = image::load_from_memory(&compressed).unwrap();
        assert_eq!(out.dimensions(), (100, 50));
        assert_eq!(out.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_compress_rejects_garbage() {
        let result = compress(b"definitely not an image");
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_generate_file_name_keeps_known_extension() {
        let name = generate_file_name("holiday.PNG");
        assert!(name.starts_with("timeline-"));
        assert!(name.ends_with(".png"));
        let parts: Vec<&str> = name.trim_end_matches(".png").split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_generate_file_name_forces_jpg_for_unknown() {
        assert!(generate_file_name("scan.bmp").ends_with(".jpg"));
        assert!(generate_file_name("noextension").ends_with(".jpg"));
    }

    #[test]
    fn test_generate_file_name_is_collision_resistant() {
        assert_ne!(generate_file_name("a.jpg"), generate_file_name("a.jpg"));
    }

    #[test]
    fn test_process_images_partial_failure() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.png");
        std::fs::write(&good, png_bytes(64, 64)).unwrap();
        let bad = tmp.path().join("bad.txt");
        std::fs::write(&bad, b"not an image").unwrap();

        let batch = process_images(&[good.clone(), bad.clone()]);
        assert_eq!(batch.successful.len(), 1);
        assert_eq!(batch.failed.len(), 1);
        assert_eq!(batch.successful[0].original, good);
        assert_eq!(batch.failed[0].original, bad);

        // Preview exists until released.
        let preview = batch.successful[0].preview.clone();
        assert!(preview.exists());
        release_preview(&preview);
        assert!(!preview.exists());
    }

    #[test]
    fn test_file_to_base64_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("payload.bin");
        std::fs::write(&path, b"hello images").unwrap();

        let encoded = file_to_base64(&path).unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"hello images");
    }
}
