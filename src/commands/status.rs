//! The `status` command: local and sync state at a glance.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let app = super::open()?;

    let entries = app.store.load().unwrap_or_default();
    let backups = app.store.backups();

    println!("Local");
    println!("=====");
    println!("Entries:     {}", entries.len());
    println!("Backups:     {}", backups.len());
    match app.store.last_save_time() {
        Some(time) => println!(
            "Last saved:  {}",
            time.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("Last saved:  never"),
    }

    println!();
    println!("Sync");
    println!("====");
    let config = app.sync.config();
    println!("Remote:      {}/{} ({})", config.owner, config.repo, config.branch);
    println!("Last sync:   {}", app.sync.last_sync_time_display());
    match app.sync.last_sync_sha() {
        Some(sha) => println!("Synced SHA:  {sha}"),
        None => println!("Synced SHA:  none"),
    }
    println!(
        "Unsynced:    {}",
        if app.store.has_unsynced_changes() {
            "local changes not yet synced"
        } else {
            "no"
        }
    );

    let has_token = app.sync.tokens().resolve().is_some();
    println!("Token:       {}", if has_token { "configured" } else { "not configured" });

    Ok(())
}
