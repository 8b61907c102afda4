//! Shared constants for storage keys, limits, and defaults.

use std::time::Duration;

// =============================================================================
// Local store keys
// =============================================================================

/// Primary collection snapshot (wrapped with `lastSaved` and `version`).
pub const STORAGE_KEY: &str = "timeline.data";
/// Bounded list of backup snapshots, newest first.
pub const BACKUP_KEY: &str = "timeline.backups";
/// Obfuscated GitHub access token.
pub const TOKEN_KEY: &str = "github.token";
/// Content SHA observed after the last successful sync.
pub const LAST_SYNC_SHA_KEY: &str = "sync.last_sha";
/// RFC 3339 timestamp of the last successful sync.
pub const LAST_SYNC_TIME_KEY: &str = "sync.last_time";
/// Session "authenticated" flag.
pub const AUTH_FLAG_KEY: &str = "session.authenticated";

/// Schema version tag written into every persisted snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// Maximum number of retained backups.
pub const MAX_BACKUPS: usize = 5;

/// Auto-save interval while an editing session is open.
pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

// =============================================================================
// Image pipeline limits
// =============================================================================

/// Target size for a compressed image.
pub const MAX_IMAGE_SIZE: u64 = 500 * 1024;
/// Largest accepted input file (5x the post-compression target).
pub const MAX_UPLOAD_SIZE: u64 = MAX_IMAGE_SIZE * 5;
/// Maximum output width in pixels.
pub const MAX_IMAGE_WIDTH: u32 = 1200;
/// Maximum output height in pixels.
pub const MAX_IMAGE_HEIGHT: u32 = 800;
/// First-pass JPEG quality.
pub const JPEG_QUALITY: u8 = 85;
/// Retry JPEG quality when the first pass overshoots the target size.
pub const JPEG_RETRY_QUALITY: u8 = 60;

/// MIME types accepted by the image pipeline.
pub const SUPPORTED_IMAGE_MIMES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// File extensions recognized as images (lowercase).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

// =============================================================================
// Remote defaults
// =============================================================================

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default branch written to by data and image commits.
pub const DEFAULT_BRANCH: &str = "main";
/// Default repository path of the serialized data file.
pub const DEFAULT_DATA_PATH: &str = "src/data/timelineData.js";
/// Default repository directory holding uploaded images.
pub const DEFAULT_IMAGES_PATH: &str = "public/images";

/// Environment variable that overrides any locally stored token.
pub const TOKEN_ENV_VAR: &str = "LIFELOG_GITHUB_TOKEN";
/// Environment variable that overrides the lifelog home directory.
pub const HOME_ENV_VAR: &str = "LIFELOG_HOME";

/// HTTP connect timeout for remote calls.
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP timeout for receiving a response body.
pub const HTTP_RECV_BODY_TIMEOUT_SECS: u64 = 60;
