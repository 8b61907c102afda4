//! The `sync` command: push the collection to the remote repository.

use crate::session::SyncOutcome;
use anyhow::Result;

/// Sync the collection, honoring the advisory conflict check unless
/// `force` is set.
pub fn execute(force: bool, message: Option<&str>) -> Result<()> {
    let mut session = super::open_session()?;

    if !session.sync_client().tokens().has_token() {
        anyhow::bail!(
            "No access token configured. Set one with `lifelog token set` \
             or export {}.",
            crate::constants::TOKEN_ENV_VAR
        );
    }

    let entries = session.entries().len();
    println!("Syncing {entries} entries...");

    match session.sync(force, message)? {
        SyncOutcome::Completed(write) => {
            println!("Synced. Remote SHA: {}", write.sha);
        }
        SyncOutcome::Conflict(check) => {
            println!("Conflict: the remote file changed since the last sync.");
            if let Some(sha) = &check.last_sync_sha {
                println!("  last synced SHA: {sha}");
            }
            if let Some(sha) = &check.current_sha {
                println!("  current SHA:     {sha}");
            }
            println!("\nInspect the remote file, then re-run with --force to overwrite.");
        }
        SyncOutcome::AlreadySyncing => {
            println!("A sync is already in progress.");
        }
    }

    session.close();
    Ok(())
}
