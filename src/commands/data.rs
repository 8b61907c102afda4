//! Import and export of the collection as flat JSON files.

use anyhow::Result;
use std::path::Path;

/// Replace the collection with the contents of a JSON file.
pub fn import(file: &Path) -> Result<()> {
    let mut session = super::open_session()?;
    let count = session.import(file)?;
    session.close();

    println!("Imported {count} entries from {}", file.display());
    Ok(())
}

/// Write the persisted collection to a dated JSON file in `dir`.
pub fn export(dir: &Path) -> Result<()> {
    let session = super::open_session()?;
    let path = session.export(dir)?;
    session.close();

    println!("Exported to {}", path.display());
    Ok(())
}
