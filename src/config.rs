//! Configuration types for lifelog.
//!
//! This module provides configuration structs for loading and validating
//! lifelog settings from TOML files. It includes:
//!
//! - [`Config`] - Root configuration struct
//! - [`GithubConfig`] - Remote repository coordinates
//!
//! All configuration types support serde deserialization and provide
//! defaults matching the published site, so a missing config file still
//! yields a working setup.

use crate::constants;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// lifelog.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
}

/// Remote repository coordinates for the sync client.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// Repository owner (user or organization).
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Repository name.
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Branch that data and image commits target.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Repository path of the serialized data file.
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Repository directory holding uploaded images.
    #[serde(default = "default_images_path")]
    pub images_path: String,
    /// Base path under which the published site serves image assets.
    #[serde(default = "default_site_base")]
    pub site_base: String,
    /// API base URL; overridable for tests and GitHub Enterprise.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_owner() -> String {
    "STller".to_string()
}

fn default_repo() -> String {
    "life-v-log".to_string()
}

fn default_branch() -> String {
    constants::DEFAULT_BRANCH.to_string()
}

fn default_data_path() -> String {
    constants::DEFAULT_DATA_PATH.to_string()
}

fn default_images_path() -> String {
    constants::DEFAULT_IMAGES_PATH.to_string()
}

fn default_site_base() -> String {
    "/life-v-log".to_string()
}

fn default_api_base() -> String {
    constants::DEFAULT_API_BASE.to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
            data_path: default_data_path(),
            images_path: default_images_path(),
            site_base: default_site_base(),
            api_base: default_api_base(),
        }
    }
}

impl GithubConfig {
    /// Public URL of an uploaded image as served by the site.
    ///
    /// Derived purely from the filename so the published site resolves the
    /// asset locally, independent of the remote store's download URL.
    pub fn image_url(&self, file_name: &str) -> String {
        format!("{}/images/{}", self.site_base, file_name)
    }

    /// Recover an image filename from a site-relative or full URL.
    ///
    /// Returns `None` when the URL matches neither form.
    pub fn file_name_from_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/images/", self.site_base);
        if let Some(name) = url.strip_prefix(&prefix) {
            return Some(name.to_string());
        }

        // Full URLs: take the last path segment.
        if url.starts_with("http://") || url.starts_with("https://") {
            let path = url.splitn(4, '/').nth(3)?;
            let name = path.rsplit('/').next()?;
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }

        None
    }
}

impl Config {
    /// Load configuration from the resolved config path.
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// contains invalid TOML.
    pub fn load() -> Result<Self> {
        let path = crate::paths::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if required coordinates are empty or the API base
    /// is not an HTTP(S) URL.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.github.owner.is_empty() {
            errors.push("github.owner cannot be empty".to_string());
        }
        if self.github.repo.is_empty() {
            errors.push("github.repo cannot be empty".to_string());
        }
        if self.github.branch.is_empty() {
            errors.push("github.branch cannot be empty".to_string());
        }
        if self.github.data_path.is_empty() {
            errors.push("github.data_path cannot be empty".to_string());
        }
        if !self.github.api_base.starts_with("http://")
            && !self.github.api_base.starts_with("https://")
        {
            errors.push(format!(
                "github.api_base must be an HTTP(S) URL, got: {}",
                self.github.api_base
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }
}
