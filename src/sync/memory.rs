//! In-memory implementation of the contents API.
//!
//! Behaves like the remote store for tests and offline development:
//! content-hash SHAs, optimistic-concurrency writes, not-found directory
//! listings. A failure switch simulates a network outage.

use super::api::{GithubApi, PutFile, RemoteDirEntry, RemoteFile, RemoteWrite, RepoPermissions};
use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory contents store keyed by repository path.
#[derive(Default)]
pub struct MemoryGithubApi {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    permissions: RwLock<RepoPermissions>,
    failing: RwLock<bool>,
}

impl MemoryGithubApi {
    pub fn new() -> Self {
        Self {
            permissions: RwLock::new(RepoPermissions {
                push: true,
                admin: false,
            }),
            ..Self::default()
        }
    }

    /// Seed a file without going through the write protocol.
    pub fn seed_file(&self, path: &str, content: &[u8]) {
        self.files.write().insert(path.to_string(), content.to_vec());
    }

    /// Current SHA of a file, if it exists.
    pub fn sha_of(&self, path: &str) -> Option<String> {
        self.files.read().get(path).map(|c| content_sha(c))
    }

    /// Raw bytes of a file, if it exists.
    pub fn content_of(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().get(path).cloned()
    }

    /// Toggle simulated outage: every call fails with a transport-level
    /// error while set.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.write() = failing;
    }

    /// Configure the permissions reported for the authenticated identity.
    pub fn set_permissions(&self, permissions: RepoPermissions) {
        *self.permissions.write() = permissions;
    }

    fn check_available(&self) -> Result<()> {
        if *self.failing.read() {
            return Err(Error::remote_status(500, "simulated outage"));
        }
        Ok(())
    }
}

fn content_sha(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

fn check_token_present(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(Error::remote_status(401, "Bad credentials"));
    }
    Ok(())
}

impl GithubApi for MemoryGithubApi {
    fn get_file(&self, token: &str, path: &str) -> Result<Option<RemoteFile>> {
        self.check_available()?;
        check_token_present(token)?;

        Ok(self.files.read().get(path).map(|content| RemoteFile {
            sha: content_sha(content),
            content: BASE64.encode(content),
            size: content.len() as u64,
            download_url: Some(format!("memory://{path}")),
        }))
    }

    fn put_file(&self, token: &str, path: &str, put: &PutFile) -> Result<RemoteWrite> {
        self.check_available()?;
        check_token_present(token)?;

        let content = BASE64
            .decode(&put.content)
            .map_err(|err| Error::remote_status(422, format!("invalid base64: {err}")))?;

        let mut files = self.files.write();
        match (files.get(path), &put.sha) {
            // Replacing requires the current SHA.
            (Some(existing), Some(sha)) if *sha != content_sha(existing) => {
                return Err(Error::remote_status(409, format!("{path} does not match {sha}")));
            }
            (Some(_), None) => {
                return Err(Error::remote_status(
                    422,
                    format!("\"sha\" wasn't supplied for existing file {path}"),
                ));
            }
            _ => {}
        }

        let sha = content_sha(&content);
        files.insert(path.to_string(), content);
        Ok(RemoteWrite {
            sha,
            download_url: Some(format!("memory://{path}")),
        })
    }

    fn delete_file(&self, token: &str, path: &str, _message: &str, sha: &str) -> Result<()> {
        self.check_available()?;
        check_token_present(token)?;

        let mut files = self.files.write();
        let Some(existing) = files.get(path) else {
            return Err(Error::remote_status(404, "Not Found"));
        };
        if content_sha(existing) != sha {
            return Err(Error::remote_status(409, format!("{path} does not match {sha}")));
        }
        files.remove(path);
        Ok(())
    }

    fn list_dir(&self, token: &str, path: &str) -> Result<Option<Vec<RemoteDirEntry>>> {
        self.check_available()?;
        check_token_present(token)?;

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let entries: Vec<RemoteDirEntry> = self
            .files
            .read()
            .iter()
            .filter(|(p, _)| p.starts_with(&prefix) && !p[prefix.len()..].contains('/'))
            .map(|(p, content)| RemoteDirEntry {
                name: p[prefix.len()..].to_string(),
                sha: content_sha(content),
                size: content.len() as u64,
                download_url: Some(format!("memory://{p}")),
                entry_type: "file".to_string(),
            })
            .collect();

        // An empty directory does not exist in a content-addressed store.
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(entries))
    }

    fn check_token(&self, token: &str) -> Result<bool> {
        self.check_available()?;
        Ok(!token.is_empty())
    }

    fn repo_permissions(&self, token: &str) -> Result<RepoPermissions> {
        self.check_available()?;
        check_token_present(token)?;
        Ok(*self.permissions.read())
    }
}
