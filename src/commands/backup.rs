//! Backup snapshot commands: `backup list`, `backup restore`.

use anyhow::Result;

/// List retained backups, newest first.
pub fn list() -> Result<()> {
    let app = super::open()?;
    let backups = app.store.backups();

    if backups.is_empty() {
        println!("No backups yet. Backups are created on every save.");
        return Ok(());
    }

    println!("{:<15} {:<20} {:>7}", "ID", "CREATED", "ENTRIES");
    for backup in &backups {
        println!(
            "{:<15} {:<20} {:>7}",
            backup.id,
            backup
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S"),
            backup.data.len()
        );
    }

    Ok(())
}

/// Restore a backup by id, making it the current collection.
pub fn restore(id: u64) -> Result<()> {
    let app = super::open()?;

    match app.store.restore_backup(id) {
        Some(entries) => {
            println!("Restored backup {id} ({} entries)", entries.len());
            Ok(())
        }
        None => anyhow::bail!("No backup with id {id}. See `lifelog backup list`."),
    }
}
