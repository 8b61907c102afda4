//! Timeline records and collection operations.
//!
//! A [`TimelineEntry`] is one dated record with a title, free-form
//! description, a kind tag, and ordered tag/image lists. The collection is a
//! plain `Vec<TimelineEntry>` kept sorted by date descending; the helpers
//! here enforce the collection invariants (sort order, unique ids, tag
//! deduplication) after every mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Well-known entry kinds with display icons.
///
/// The stored `kind` string is kept verbatim; unknown values simply fall
/// back to the daily icon when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Milestone,
    Special,
    Travel,
    Daily,
}

impl EntryKind {
    /// Parse a stored kind string; `None` for unknown values.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "milestone" => Some(Self::Milestone),
            "special" => Some(Self::Special),
            "travel" => Some(Self::Travel),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }

    /// Display icon for this kind.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Milestone => "🏆",
            Self::Special => "✨",
            Self::Travel => "✈️",
            Self::Daily => "📅",
        }
    }

    /// Icon for a stored kind string, falling back to the daily icon for
    /// unknown or missing kinds.
    pub fn icon_for(kind: &str) -> &'static str {
        Self::parse(kind).unwrap_or(Self::Daily).icon()
    }
}

/// One timeline record.
///
/// Field order matches the serialized layout of the published data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Calendar date, `YYYY-MM-DD`; primary sort key, descending.
    pub date: String,
    pub title: String,
    pub description: String,
    /// Kind tag; stored verbatim even when unrecognized.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Ordered, deduplicated tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Unique within the collection; never reused.
    pub id: u64,
}

impl TimelineEntry {
    /// Append a tag unless it is already present, preserving insertion order.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Append an image URL.
    pub fn push_image(&mut self, url: impl Into<String>) {
        self.images.push(url.into());
    }

    /// Parsed date, if the stored string is a valid `YYYY-MM-DD` date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Sort a collection by date descending.
///
/// Unparseable dates sort after valid ones; ties keep their relative order.
pub fn sort_by_date_desc(entries: &mut [TimelineEntry]) {
    entries.sort_by(|a, b| match (a.parsed_date(), b.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.date.cmp(&a.date),
    });
}

/// Next id for a new record: `max(existing ids) + 1`, starting at 1.
///
/// Computed from the current collection at assignment time; ids are never
/// reused and need not be contiguous.
pub fn next_id(entries: &[TimelineEntry]) -> u64 {
    entries.iter().map(|e| e.id).max().unwrap_or(0) + 1
}

/// Check that every id in the collection is unique.
pub fn ids_unique(entries: &[TimelineEntry]) -> bool {
    let mut seen = std::collections::HashSet::new();
    entries.iter().all(|e| seen.insert(e.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, date: &str) -> TimelineEntry {
        TimelineEntry {
            date: date.to_string(),
            title: format!("entry {id}"),
            description: "text".to_string(),
            kind: "daily".to_string(),
            tags: vec![],
            images: vec![],
            id,
        }
    }

    #[test]
    fn test_sort_by_date_desc() {
        let mut entries = vec![
            entry(1, "2024-01-01"),
            entry(2, "2024-03-01"),
            entry(3, "2023-12-31"),
        ];
        sort_by_date_desc(&mut entries);
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_puts_unparseable_dates_last() {
        let mut entries = vec![entry(1, "not-a-date"), entry(2, "2024-01-01")];
        sort_by_date_desc(&mut entries);
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[1].id, 1);
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(&[]), 1);
        assert_eq!(next_id(&[entry(1, "2024-01-01"), entry(7, "2024-01-02")]), 8);
    }

    #[test]
    fn test_push_tag_dedup() {
        let mut e = entry(1, "2024-01-01");
        e.push_tag("travel");
        e.push_tag("food");
        e.push_tag("travel");
        assert_eq!(e.tags, vec!["travel", "food"]);
    }

    #[test]
    fn test_kind_icons() {
        assert_eq!(EntryKind::icon_for("milestone"), "🏆");
        assert_eq!(EntryKind::icon_for("special"), "✨");
        assert_eq!(EntryKind::icon_for("travel"), "✈️");
        assert_eq!(EntryKind::icon_for("daily"), "📅");
        // Unknown kinds fall back to the daily icon.
        assert_eq!(EntryKind::icon_for("mystery"), "📅");
        assert_eq!(EntryKind::icon_for(""), "📅");
    }

    #[test]
    fn test_serde_round_trip_preserves_unknown_kind() {
        let json = r#"{
            "date": "2024-01-01",
            "title": "t",
            "description": "d",
            "type": "mystery",
            "tags": ["a"],
            "images": [],
            "id": 3
        }"#;
        let e: TimelineEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.kind, "mystery");
        let out = serde_json::to_value(&e).unwrap();
        assert_eq!(out["type"], "mystery");
    }

    #[test]
    fn test_serde_defaults_for_missing_lists() {
        let json = r#"{"date": "2024-01-01", "title": "t", "description": "d", "id": 1}"#;
        let e: TimelineEntry = serde_json::from_str(json).unwrap();
        assert!(e.tags.is_empty());
        assert!(e.images.is_empty());
        assert!(e.kind.is_empty());
    }

    #[test]
    fn test_ids_unique() {
        assert!(ids_unique(&[entry(1, "2024-01-01"), entry(2, "2024-01-01")]));
        assert!(!ids_unique(&[entry(1, "2024-01-01"), entry(1, "2024-01-02")]));
    }
}
