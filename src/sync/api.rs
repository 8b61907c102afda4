//! Wire types and the remote-contents trait.
//!
//! Defines the interface the sync client talks through, enabling pluggable
//! remotes (live GitHub over HTTP, in-memory fake for tests).

use crate::error::Result;
use serde::Deserialize;

/// The remote store's view of one file, as returned by a contents read.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    /// Content-hash token; the optimistic-concurrency handle for writes.
    pub sha: String,
    /// Raw base64 content as delivered by the API (may contain newlines).
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// A contents write request.
#[derive(Debug, Clone)]
pub struct PutFile {
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    /// SHA of the file being replaced; `None` creates a fresh file.
    pub sha: Option<String>,
    pub branch: String,
}

/// The remote store's acknowledgement of a write.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteWrite {
    pub sha: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteDirEntry {
    pub name: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
    /// `"file"` or `"dir"`.
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// Push/admin permission of the authenticated identity on the repository.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RepoPermissions {
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub admin: bool,
}

/// Remote contents API surface used by the sync client.
///
/// Paths are repository-relative (e.g. `src/data/timelineData.js`). All
/// calls are blocking; a failed call surfaces immediately as an error
/// rather than being retried.
pub trait GithubApi: Send + Sync {
    /// Read one file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-success status
    /// other than not-found.
    fn get_file(&self, token: &str, path: &str) -> Result<Option<RemoteFile>>;

    /// Create or replace one file.
    ///
    /// Replacing requires the current SHA in `put.sha`; the remote rejects
    /// a stale or missing SHA.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, SHA mismatch, or auth
    /// failure.
    fn put_file(&self, token: &str, path: &str, put: &PutFile) -> Result<RemoteWrite>;

    /// Delete one file. The remote requires the file's current SHA.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-success status.
    fn delete_file(&self, token: &str, path: &str, message: &str, sha: &str) -> Result<()>;

    /// List a directory.
    ///
    /// Returns `Ok(None)` if the directory does not exist; callers decide
    /// whether that means "empty".
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-success status
    /// other than not-found.
    fn list_dir(&self, token: &str, path: &str) -> Result<Option<Vec<RemoteDirEntry>>>;

    /// Probe the identity endpoint with the given token.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure; a rejected token is
    /// `Ok(false)`.
    fn check_token(&self, token: &str) -> Result<bool>;

    /// Permissions of the authenticated identity on the repository.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-success status.
    fn repo_permissions(&self, token: &str) -> Result<RepoPermissions>;
}
