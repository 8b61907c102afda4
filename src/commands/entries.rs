//! Entry management commands: `list`, `add`, `edit`, `rm`.

use crate::model::EntryKind;
use crate::session::{EntryUpdate, NewEntry};
use anyhow::Result;

/// Print the timeline, newest first, optionally filtered by tag.
pub fn list(tag: Option<&str>) -> Result<()> {
    let session = super::open_session()?;
    let entries = session.entries();
    session.close();

    let filtered: Vec<_> = entries
        .iter()
        .filter(|e| tag.is_none_or(|t| e.tags.iter().any(|tag| tag.as_str() == t)))
        .collect();

    if filtered.is_empty() {
        match tag {
            Some(tag) => println!("No entries tagged '{tag}'."),
            None => println!("No entries yet. Add one with `lifelog add`."),
        }
        return Ok(());
    }

    for entry in &filtered {
        println!(
            "{:>4}  {}  {} {}",
            entry.id,
            entry.date,
            EntryKind::icon_for(&entry.kind),
            entry.title
        );
        if !entry.description.is_empty() {
            println!("      {}", entry.description);
        }
        if !entry.tags.is_empty() {
            println!("      tags: {}", entry.tags.join(", "));
        }
        if !entry.images.is_empty() {
            println!("      images: {}", entry.images.len());
        }
    }

    println!("\n{} entries", filtered.len());
    Ok(())
}

/// Add a new entry and report its assigned id.
pub fn add(
    date: String,
    title: String,
    description: String,
    kind: String,
    tags: Vec<String>,
    images: Vec<String>,
) -> Result<()> {
    let mut session = super::open_session()?;
    let id = session.add(NewEntry {
        date,
        title,
        description,
        kind,
        tags,
        images,
    })?;
    session.close();

    println!("Added entry {id}");
    Ok(())
}

/// Apply a partial edit; omitted flags keep the current values.
pub fn edit(
    id: u64,
    date: Option<String>,
    title: Option<String>,
    description: Option<String>,
    kind: Option<String>,
    tags: Option<Vec<String>>,
) -> Result<()> {
    let mut session = super::open_session()?;
    session.update(
        id,
        EntryUpdate {
            date,
            title,
            description,
            kind,
            tags,
            images: None,
        },
    )?;
    session.close();

    println!("Updated entry {id}");
    Ok(())
}

/// Delete an entry after confirmation.
pub fn remove(id: u64, yes: bool) -> Result<()> {
    let mut session = super::open_session()?;

    if !yes {
        let title = session
            .entries()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.clone());
        let prompt = match title {
            Some(title) => format!("Delete entry {id} ('{title}')?"),
            None => format!("Delete entry {id}?"),
        };
        if !super::confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    session.remove(id)?;
    session.close();

    println!("Deleted entry {id}");
    Ok(())
}
