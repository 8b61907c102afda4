//! The remote sync client.
//!
//! Wraps the contents API with the operations the editing session needs:
//! read the data file, commit it back under SHA-based optimistic
//! concurrency, detect conflicts against the last observed SHA, and manage
//! image files. The last-known sync SHA and timestamp are explicit fields
//! of the client's persisted state (flat keys in the local store), absent
//! until the first successful sync and removed only by clearing the store.

use super::api::{GithubApi, PutFile, RemoteWrite};
use super::content::{default_commit_message, generate_file_content};
use super::token::TokenStore;
use crate::config::GithubConfig;
use crate::constants::{IMAGE_EXTENSIONS, LAST_SYNC_SHA_KEY, LAST_SYNC_TIME_KEY};
use crate::error::{Error, Result};
use crate::image::ProcessedImage;
use crate::model::TimelineEntry;
use crate::store::KvStore;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decoded view of the remote data file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub sha: String,
    /// Decoded text content.
    pub content: String,
    pub size: u64,
    pub download_url: Option<String>,
}

/// Outcome of a conflict check.
///
/// Advisory only: the caller decides whether to proceed.
#[derive(Debug, Clone, Default)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    pub current_sha: Option<String>,
    pub last_sync_sha: Option<String>,
    pub remote_content: Option<String>,
}

/// An image processed locally and queued for upload.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_base64: String,
}

impl From<&ProcessedImage> for PendingUpload {
    fn from(image: &ProcessedImage) -> Self {
        Self {
            file_name: image.file_name.clone(),
            content_base64: image.to_base64(),
        }
    }
}

/// A successfully uploaded image.
///
/// `url` is derived purely from the filename so the published site
/// resolves it locally; `download_url` is the remote store's own view.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub url: String,
    pub download_url: Option<String>,
    pub sha: String,
}

/// A failed item of a batch upload.
#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub file_name: String,
    pub error: String,
}

/// Summary of a sequential batch upload.
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub successful: Vec<UploadedImage>,
    pub failed: Vec<UploadFailure>,
    pub total_count: usize,
}

impl UploadSummary {
    pub fn success_count(&self) -> usize {
        self.successful.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// One image file in the remote images directory.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    pub name: String,
    pub url: String,
    pub download_url: Option<String>,
    pub size: u64,
    pub sha: String,
}

/// Sentinel shown when no sync has been recorded.
pub const NEVER_SYNCED: &str = "never synced";
/// Sentinel shown when the stored sync timestamp fails to parse.
pub const INVALID_SYNC_TIME: &str = "invalid timestamp";

/// Remote sync client over a pluggable contents API.
#[derive(Clone)]
pub struct SyncClient {
    api: Arc<dyn GithubApi>,
    config: GithubConfig,
    tokens: TokenStore,
    kv: KvStore,
}

impl SyncClient {
    pub fn new(api: Arc<dyn GithubApi>, config: GithubConfig, kv: KvStore) -> Self {
        Self {
            api,
            config,
            tokens: TokenStore::new(kv.clone()),
            kv,
        }
    }

    /// Token storage for the CLI token commands.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    fn token(&self) -> Result<String> {
        self.tokens.resolve().ok_or(Error::TokenMissing)
    }

    /// Fetch the current state of the remote data file.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TokenMissing`] when no token is configured, with
    /// [`Error::RemoteFileMissing`] when the data file does not exist, and
    /// with a transport or status error on any other non-success response.
    pub fn current_file_info(&self) -> Result<FileInfo> {
        let token = self.token()?;
        let path = &self.config.data_path;

        let file = self
            .api
            .get_file(&token, path)?
            .ok_or_else(|| Error::RemoteFileMissing { path: path.clone() })?;

        Ok(FileInfo {
            content: decode_base64_content(&file.content)?,
            sha: file.sha,
            size: file.size,
            download_url: file.download_url,
        })
    }

    /// Commit the collection to the remote data file.
    ///
    /// Reads the current remote SHA (required by the write protocol),
    /// renders the data-file text, and submits the write. On success the
    /// new SHA and a sync timestamp are persisted locally for future
    /// conflict checks.
    ///
    /// # Errors
    ///
    /// Fails if the remote file cannot be read, or if the write is
    /// rejected (SHA mismatch, auth failure, transport error).
    pub fn commit(&self, entries: &[TimelineEntry], message: Option<&str>) -> Result<RemoteWrite> {
        let token = self.token()?;
        let current = self.current_file_info()?;
        let content = generate_file_content(entries);

        let put = PutFile {
            message: message.map_or_else(default_commit_message, str::to_string),
            content: BASE64.encode(content.as_bytes()),
            sha: Some(current.sha),
            branch: self.config.branch.clone(),
        };

        let write = self.api.put_file(&token, &self.config.data_path, &put)?;
        self.record_sync(&write.sha);
        info!(sha = %write.sha, entries = entries.len(), "committed timeline data");
        Ok(write)
    }

    /// Compare the remote file's SHA against the last one this client
    /// observed after a successful sync.
    ///
    /// Advisory and fail-open: any fetch failure is logged and reported as
    /// "no conflict" rather than blocking the caller.
    pub fn detect_conflict(&self) -> ConflictCheck {
        let current = match self.current_file_info() {
            Ok(info) => info,
            Err(err) => {
                warn!("conflict check failed, proceeding without it: {err}");
                return ConflictCheck::default();
            }
        };

        let last_sync_sha = self.last_sync_sha();
        if let Some(last) = &last_sync_sha
            && *last != current.sha
        {
            return ConflictCheck {
                has_conflict: true,
                current_sha: Some(current.sha),
                last_sync_sha,
                remote_content: Some(current.content),
            };
        }

        ConflictCheck {
            current_sha: Some(current.sha),
            last_sync_sha,
            ..ConflictCheck::default()
        }
    }

    /// Probe the identity endpoint with the given or configured token.
    ///
    /// Never fails: a missing token, rejected token, or network failure
    /// all read as `false`.
    pub fn validate_token(&self, token: Option<&str>) -> bool {
        let token = match token {
            Some(t) => t.to_string(),
            None => match self.tokens.resolve() {
                Some(t) => t,
                None => return false,
            },
        };

        match self.api.check_token(&token) {
            Ok(valid) => valid,
            Err(err) => {
                debug!("token validation failed: {err}");
                false
            }
        }
    }

    /// SHA recorded after the last successful sync, if any.
    pub fn last_sync_sha(&self) -> Option<String> {
        self.kv.get(LAST_SYNC_SHA_KEY).ok().flatten()
    }

    /// Localized rendering of the last sync timestamp, or a sentinel when
    /// none exists or the stored value is unparseable.
    pub fn last_sync_time_display(&self) -> String {
        let Ok(Some(stored)) = self.kv.get(LAST_SYNC_TIME_KEY) else {
            return NEVER_SYNCED.to_string();
        };
        match stored.parse::<DateTime<Utc>>() {
            Ok(time) => time
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Err(_) => INVALID_SYNC_TIME.to_string(),
        }
    }

    fn record_sync(&self, sha: &str) {
        if let Err(err) = self.kv.set(LAST_SYNC_SHA_KEY, sha) {
            warn!("failed to record sync SHA: {err}");
        }
        if let Err(err) = self.kv.set(LAST_SYNC_TIME_KEY, &Utc::now().to_rfc3339()) {
            warn!("failed to record sync time: {err}");
        }
    }

    // =========================================================================
    // Image operations
    // =========================================================================

    /// Upload one image file.
    ///
    /// If a file already exists at the target path its SHA is fetched so
    /// the write updates in place; otherwise the SHA is omitted for a
    /// fresh create.
    ///
    /// # Errors
    ///
    /// Fails on missing token, transport failure, or a rejected write.
    pub fn upload_image(&self, file_name: &str, base64_content: &str) -> Result<UploadedImage> {
        let token = self.token()?;
        let path = self.image_path(file_name);

        let existing_sha = self.api.get_file(&token, &path)?.map(|f| f.sha);

        let put = PutFile {
            message: format!("Upload image: {file_name}"),
            content: base64_content.to_string(),
            sha: existing_sha,
            branch: self.config.branch.clone(),
        };

        let write = self.api.put_file(&token, &path, &put)?;
        debug!(file_name, sha = %write.sha, "uploaded image");

        Ok(UploadedImage {
            file_name: file_name.to_string(),
            url: self.config.image_url(file_name),
            download_url: write.download_url,
            sha: write.sha,
        })
    }

    /// Upload a batch sequentially.
    ///
    /// Per-item success/failure is collected independently; one failed
    /// item never aborts its siblings.
    pub fn upload_images(&self, images: &[PendingUpload]) -> UploadSummary {
        let mut summary = UploadSummary {
            total_count: images.len(),
            ..UploadSummary::default()
        };

        for image in images {
            match self.upload_image(&image.file_name, &image.content_base64) {
                Ok(uploaded) => summary.successful.push(uploaded),
                Err(err) => summary.failed.push(UploadFailure {
                    file_name: image.file_name.clone(),
                    error: err.to_string(),
                }),
            }
        }

        summary
    }

    /// Delete one image file. The remote requires its current SHA.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::RemoteFileMissing`] if the file does not exist,
    /// or on any transport or status error.
    pub fn delete_image(&self, file_name: &str) -> Result<()> {
        let token = self.token()?;
        let path = self.image_path(file_name);

        let file = self
            .api
            .get_file(&token, &path)?
            .ok_or_else(|| Error::RemoteFileMissing { path: path.clone() })?;

        self.api
            .delete_file(&token, &path, &format!("Delete image: {file_name}"), &file.sha)?;
        info!(file_name, "deleted image");
        Ok(())
    }

    /// Enumerate the remote images directory.
    ///
    /// A missing directory reads as an empty list. Entries are filtered to
    /// recognized image extensions.
    ///
    /// # Errors
    ///
    /// Fails on missing token or transport failure.
    pub fn list_images(&self) -> Result<Vec<RemoteImage>> {
        let token = self.token()?;

        let Some(entries) = self.api.list_dir(&token, &self.config.images_path)? else {
            return Ok(Vec::new());
        };

        Ok(entries
            .into_iter()
            .filter(|e| e.entry_type == "file" && has_image_extension(&e.name))
            .map(|e| RemoteImage {
                url: self.config.image_url(&e.name),
                name: e.name,
                download_url: e.download_url,
                size: e.size,
                sha: e.sha,
            })
            .collect())
    }

    /// Check whether the authenticated identity can push to the repository.
    ///
    /// Never fails: missing token or any remote error reads as `false`.
    pub fn validate_image_upload_permission(&self) -> bool {
        let Some(token) = self.tokens.resolve() else {
            return false;
        };
        match self.api.repo_permissions(&token) {
            Ok(perms) => perms.push || perms.admin,
            Err(err) => {
                debug!("permission check failed: {err}");
                false
            }
        }
    }

    fn image_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.config.images_path, file_name)
    }
}

/// Decode base64 content from a contents read, tolerating the newlines
/// the API inserts.
fn decode_base64_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact)
        .map_err(|err| Error::Decode(format!("invalid base64: {err}")))?;
    String::from_utf8(bytes).map_err(|err| Error::Decode(format!("invalid UTF-8: {err}")))
}

fn has_image_extension(name: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}
