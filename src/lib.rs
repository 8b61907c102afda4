//! lifelog: a local-first personal timeline with GitHub-backed sync.
//!
//! The library is organized around four cooperating subsystems:
//!
//! - [`store`] - local persistence (snapshots, bounded backups, import/export)
//! - [`image`] - the upload pipeline (validate, resize, re-encode, name)
//! - [`sync`] - the remote client (Contents API, SHA-based concurrency)
//! - [`session`] - the editing session orchestrator and auto-save
//!
//! The CLI in [`commands`] is a thin layer over these; everything it does
//! is available to library consumers.

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod image;
pub mod model;
pub mod paths;
pub mod session;
pub mod store;
pub mod sync;
pub mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Local-first personal timeline with GitHub-backed sync.
#[derive(Parser)]
#[command(name = "lifelog", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the timeline
    List {
        /// Only show entries carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Add a timeline entry
    Add {
        /// Entry date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Entry title
        #[arg(long)]
        title: String,
        /// Entry body text
        #[arg(long)]
        description: String,
        /// Entry kind (daily, travel, milestone, special)
        #[arg(long, default_value = "daily")]
        kind: String,
        /// Tags, repeatable
        #[arg(long)]
        tag: Vec<String>,
        /// Image URLs to attach, repeatable
        #[arg(long)]
        image: Vec<String>,
    },

    /// Edit an existing entry; omitted fields keep their values
    Edit {
        /// Entry id
        id: u64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        /// Replace the tag list, repeatable
        #[arg(long)]
        tag: Option<Vec<String>>,
    },

    /// Delete an entry
    Rm {
        /// Entry id
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Import a collection from a JSON file, replacing the current one
    Import {
        /// Path to a JSON array of entries
        file: PathBuf,
    },

    /// Export the collection to a dated JSON file
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Push the collection to the remote repository
    Sync {
        /// Commit even if the remote changed since the last sync
        #[arg(long, short)]
        force: bool,
        /// Custom commit message
        #[arg(long, short)]
        message: Option<String>,
    },

    /// Show local and sync status
    Status,

    /// Manage local backup snapshots
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Manage the GitHub access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage images in the remote repository
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// List retained backups, newest first
    List,
    /// Restore a backup by id
    Restore {
        /// Backup id as shown by `lifelog backup list`
        id: u64,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Store a token in the local store
    Set {
        /// The token value
        token: String,
    },
    /// Remove the stored token
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Check that the effective token is accepted by the remote
    Validate,
}

#[derive(Subcommand)]
pub enum ImagesAction {
    /// Process local image files and upload them
    Upload {
        /// Image files to upload
        files: Vec<PathBuf>,
    },
    /// List images in the remote images directory
    List,
    /// Delete a remote image by filename
    Rm {
        /// Image filename, e.g. timeline-1700000000000-abc123.jpg
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}
