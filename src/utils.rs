//! Shared utility functions.

/// Format a byte count in base-1024 units.
///
/// Matches the formatting used in upload summaries: two decimal places with
/// trailing zeros trimmed.
///
/// # Examples
///
/// ```
/// use lifelog::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1024), "1 KB");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(2_621_440), "2.5 MB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);

    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exp])
}

/// Compression ratio as a percentage with one decimal place.
///
/// Computed as `(1 - compressed/original) * 100`; negative when the
/// "compressed" output grew.
#[allow(clippy::cast_precision_loss)]
pub fn compression_ratio(original: u64, compressed: u64) -> String {
    if original == 0 {
        return "0.0".to_string();
    }
    let ratio = (1.0 - compressed as f64 / original as f64) * 100.0;
    format!("{ratio:.1}")
}
