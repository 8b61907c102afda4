//! CLI command implementations for lifelog.
//!
//! Each submodule implements one command family:
//!
//! - [`entries`] - `list` / `add` / `edit` / `rm`
//! - [`data`] - `import` / `export`
//! - [`sync`] - push the collection to the remote repository
//! - [`status`] - local and sync status at a glance
//! - [`backup`] - list and restore retained snapshots
//! - [`token`] - store, clear, and validate the access token
//! - [`images`] - process, upload, list, and delete remote images
//!
//! Every command opens the same stack: config from `lifelog.toml`, the
//! redb-backed local store, and the HTTP sync client.

pub mod backup;
pub mod data;
pub mod entries;
pub mod images;
pub mod status;
pub mod sync;
pub mod token;

use crate::config::Config;
use crate::session::EditorSession;
use crate::store::{KvStore, LocalStore};
use crate::sync::{HttpGithubApi, SyncClient};
use anyhow::{Context, Result};
use std::io::Write as _;
use std::sync::Arc;

/// The opened application stack shared by all commands.
pub struct App {
    pub store: LocalStore,
    pub sync: SyncClient,
}

/// Open config, local store, and sync client.
pub fn open() -> Result<App> {
    let config = Config::load()?;
    let path = crate::paths::store_path()?;
    let kv = KvStore::file(&path)
        .with_context(|| format!("Failed to open local store at {}", path.display()))?;

    let store = LocalStore::new(kv.clone());
    let api = Arc::new(HttpGithubApi::new(&config.github));
    let sync = SyncClient::new(api, config.github, kv);

    Ok(App { store, sync })
}

/// Open a full editing session (loads the collection, starts auto-save).
pub fn open_session() -> Result<EditorSession> {
    let app = open()?;
    Ok(EditorSession::open(app.store, app.sync))
}

/// Ask a yes/no question on stdout; anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
