//! Terminal rendering of search results.

use chrono::{DateTime, NaiveDateTime, Utc};

use docinspect_core::{CanonicalMetadata, DocumentChunk, Error, Identity};

/// Placeholder for absent metadata fields.
pub const NOT_AVAILABLE: &str = "N/A";

const RETRY_HINT: &str = "Check the document chunk ID and try again.";

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Format a last-updated value for display.
///
/// RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS` values are shown in
/// UTC. Anything else is shown as received.
pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return NOT_AVAILABLE.to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }
    raw.to_string()
}

pub fn render_metadata(metadata: &CanonicalMetadata) -> String {
    let rows = [
        ("Document Chunk ID", metadata.id.clone()),
        ("URL", or_na(metadata.url.as_deref()).to_string()),
        ("Title", metadata.title.clone()),
        ("Depot Name", or_na(metadata.depot_name.as_deref()).to_string()),
        ("Last Updated", format_date(metadata.last_updated.as_deref())),
        ("Page Type", or_na(metadata.page_type.as_deref()).to_string()),
    ];

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
    rows.iter()
        .map(|(label, value)| format!("  {:<width$} {}", format!("{}:", label), value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Metadata block followed by the content block.
pub fn render_chunk(chunk: &DocumentChunk) -> String {
    format!(
        "Document Metadata\n{}\n\nDocument Content\n{}",
        render_metadata(&chunk.metadata),
        chunk.content
    )
}

pub fn render_json(chunk: &DocumentChunk) -> serde_json::Result<String> {
    serde_json::to_string_pretty(chunk)
}

/// The error message, plus a retry hint unless the message already says
/// what to do.
pub fn render_error(err: &Error) -> String {
    match err {
        Error::InvalidInput(_)
        | Error::ResourceNotFound(_)
        | Error::AuthExpired
        | Error::AcquisitionFailed(_) => format!("Error: {}", err),
        _ => format!("Error: {}\n{}", err, RETRY_HINT),
    }
}

pub fn render_welcome(identity: &Identity) -> String {
    format!("Welcome, {} ({})", identity.display_name(), identity.username)
}
