//! Remote synchronization over a content-addressed file store.
//!
//! The collection lives remotely as one generated source file; images are
//! individual files next to it. Writes use SHA-based optimistic
//! concurrency, and the SHA observed after each successful sync is kept in
//! the local store for advisory conflict detection.
//!
//! The [`GithubApi`] trait decouples the client from transport:
//!
//! - **HttpGithubApi**: the live GitHub Contents API over ureq
//! - **MemoryGithubApi**: an in-memory remote for tests and offline work

mod api;
mod client;
mod content;
mod http;
mod memory;
mod token;


pub use api::{GithubApi, PutFile, RemoteDirEntry, RemoteFile, RemoteWrite, RepoPermissions};
pub use client::{
    ConflictCheck, FileInfo, INVALID_SYNC_TIME, NEVER_SYNCED, PendingUpload, RemoteImage,
    SyncClient, UploadFailure, UploadSummary, UploadedImage,
};
pub use content::{default_commit_message, generate_file_content, parse_embedded_data};
pub use http::HttpGithubApi;
pub use memory::MemoryGithubApi;
pub use token::TokenStore;
