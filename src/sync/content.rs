//! Generation and parsing of the committed data file.
//!
//! The published site imports its data as a JavaScript module, so each
//! commit writes `export const timelineData = <json>;` followed by a fixed
//! field-documentation block and the generation timestamp. Generation is
//! deterministic apart from the timestamp line.

use crate::error::{Error, Result};
use crate::model::TimelineEntry;
use chrono::{SecondsFormat, Utc};

/// Render the collection as the data-file source text.
pub fn generate_file_content(entries: &[TimelineEntry]) -> String {
    let data = serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string());
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    format!(
        "export const timelineData = {data};\n\
         \n\
         // Field reference:\n\
         // id: unique identifier\n\
         // date: date (YYYY-MM-DD)\n\
         // title: entry title\n\
         // description: entry body\n\
         // images: image URLs (multiple allowed)\n\
         // tags: tags for filtering and grouping\n\
         // type: kind (milestone, special, travel, daily)\n\
         \n\
         // Last updated: {timestamp}\n\
         // Updated via: online editor\n"
    )
}

/// Parse the collection back out of generated data-file text.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the text does not carry an embedded JSON
/// array in the expected shape.
pub fn parse_embedded_data(content: &str) -> Result<Vec<TimelineEntry>> {
    let start = content
        .find('=')
        .ok_or_else(|| Error::Decode("no assignment found in data file".to_string()))?
        + 1;
    let end = content
        .rfind(';')
        .ok_or_else(|| Error::Decode("no terminator found in data file".to_string()))?;
    if end <= start {
        return Err(Error::Decode("malformed data file".to_string()));
    }

    let json = content[start..end].trim();
    serde_json::from_str(json).map_err(|err| Error::Decode(format!("embedded data: {err}")))
}

/// Default commit message for data syncs.
pub fn default_commit_message() -> String {
    format!(
        "Update timeline data ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}
