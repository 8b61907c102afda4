//! HTTP implementation of the contents API over ureq.
//!
//! Talks to the GitHub Contents API with bearer-token authentication.
//! Non-2xx responses are surfaced as [`Error::RemoteStatus`] carrying the
//! remote's status code and message; network failures become
//! [`Error::Transport`]. No retry policy is applied.

use super::api::{GithubApi, PutFile, RemoteDirEntry, RemoteFile, RemoteWrite, RepoPermissions};
use crate::config::GithubConfig;
use crate::constants::{HTTP_CONNECT_TIMEOUT_SECS, HTTP_RECV_BODY_TIMEOUT_SECS};
use crate::error::{Error, Result};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::time::Duration;

/// Characters escaped in repository paths embedded in request URLs.
/// `/` is intentionally kept literal to preserve path segments.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Error body shape of the GitHub API.
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Envelope of a contents write response.
#[derive(Debug, Deserialize)]
struct WriteEnvelope {
    content: RemoteWrite,
}

/// Live GitHub Contents API client.
pub struct HttpGithubApi {
    agent: ureq::Agent,
    api_base: String,
    owner: String,
    repo: String,
}

impl HttpGithubApi {
    pub fn new(config: &GithubConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS)))
            .timeout_recv_body(Some(Duration::from_secs(HTTP_RECV_BODY_TIMEOUT_SECS)))
            .build();

        Self {
            agent: agent_config.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.owner,
            self.repo,
            utf8_percent_encode(path, PATH_ESCAPE)
        )
    }

    fn auth_header(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Extract the remote's error message from a non-success response,
    /// falling back to the status reason.
    fn error_from(mut response: ureq::http::Response<ureq::Body>) -> Error {
        let status = response.status();
        let message = response
            .body_mut()
            .read_json::<ApiError>()
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Error::remote_status(status.as_u16(), message)
    }
}

impl GithubApi for HttpGithubApi {
    fn get_file(&self, token: &str, path: &str) -> Result<Option<RemoteFile>> {
        let mut response = self
            .agent
            .get(&self.contents_url(path))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .call()
            .map_err(|err| Error::transport(format!("fetching {path}"), err))?;

        match response.status().as_u16() {
            200 => {
                let file = response
                    .body_mut()
                    .read_json::<RemoteFile>()
                    .map_err(|err| Error::Decode(err.to_string()))?;
                Ok(Some(file))
            }
            404 => Ok(None),
            _ => Err(Self::error_from(response)),
        }
    }

    fn put_file(&self, token: &str, path: &str, put: &PutFile) -> Result<RemoteWrite> {
        let mut body = serde_json::json!({
            "message": put.message,
            "content": put.content,
            "branch": put.branch,
        });
        if let Some(sha) = &put.sha {
            body["sha"] = serde_json::Value::String(sha.clone());
        }

        let mut response = self
            .agent
            .put(&self.contents_url(path))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .send_json(&body)
            .map_err(|err| Error::transport(format!("writing {path}"), err))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }

        let envelope = response
            .body_mut()
            .read_json::<WriteEnvelope>()
            .map_err(|err| Error::Decode(err.to_string()))?;
        Ok(envelope.content)
    }

    fn delete_file(&self, token: &str, path: &str, message: &str, sha: &str) -> Result<()> {
        let body = serde_json::json!({
            "message": message,
            "sha": sha,
        });

        let response = self
            .agent
            .delete(&self.contents_url(path))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .force_send_body()
            .send_json(&body)
            .map_err(|err| Error::transport(format!("deleting {path}"), err))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }
        Ok(())
    }

    fn list_dir(&self, token: &str, path: &str) -> Result<Option<Vec<RemoteDirEntry>>> {
        let mut response = self
            .agent
            .get(&self.contents_url(path))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .call()
            .map_err(|err| Error::transport(format!("listing {path}"), err))?;

        match response.status().as_u16() {
            200 => {
                let entries = response
                    .body_mut()
                    .read_json::<Vec<RemoteDirEntry>>()
                    .map_err(|err| Error::Decode(err.to_string()))?;
                Ok(Some(entries))
            }
            404 => Ok(None),
            _ => Err(Self::error_from(response)),
        }
    }

    fn check_token(&self, token: &str) -> Result<bool> {
        let response = self
            .agent
            .get(&format!("{}/user", self.api_base))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .call()
            .map_err(|err| Error::transport("validating token", err))?;

        Ok(response.status().is_success())
    }

    fn repo_permissions(&self, token: &str) -> Result<RepoPermissions> {
        #[derive(Debug, Default, Deserialize)]
        struct RepoInfo {
            #[serde(default)]
            permissions: RepoPermissions,
        }

        let mut response = self
            .agent
            .get(&format!(
                "{}/repos/{}/{}",
                self.api_base, self.owner, self.repo
            ))
            .header("Authorization", &Self::auth_header(token))
            .header("Accept", ACCEPT_HEADER)
            .call()
            .map_err(|err| Error::transport("fetching repository info", err))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response));
        }

        let info = response
            .body_mut()
            .read_json::<RepoInfo>()
            .map_err(|err| Error::Decode(err.to_string()))?;
        Ok(info.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_url_encodes_spaces_but_keeps_slashes() {
        let config = GithubConfig {
            api_base: "https://api.github.com/".to_string(),
            ..GithubConfig::default()
        };
        let api = HttpGithubApi::new(&config);
        assert_eq!(
            api.contents_url("src/data/timelineData.js"),
            "https://api.github.com/repos/STller/life-v-log/contents/src/data/timelineData.js"
        );
        assert_eq!(
            api.contents_url("public/images/my photo.jpg"),
            "https://api.github.com/repos/STller/life-v-log/contents/public/images/my%20photo.jpg"
        );
    }
}
