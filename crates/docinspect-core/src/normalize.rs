//! Response normalization.
//!
//! Backend deployments disagree on the shape of a document chunk: keys may
//! be hyphenated (`document-chunk-id`) or camel-case (`documentChunkId`),
//! the record may sit inside an `itemSpec` envelope, and metadata may be
//! nested under `metadata` or flattened onto the record. [`normalize`] maps
//! any of these shapes onto a [`DocumentChunk`] and never fails.
//!
//! Lookups go through [`FieldSource`], so the alias rules can be exercised
//! against plain maps as well as JSON values.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::trace;

use crate::defaults;
use crate::models::{CanonicalMetadata, DocumentChunk, DocumentChunkId};

/// Content keys, probed in order on the working record.
pub const CONTENT_ALIASES: &[&str] = &["content", "body", "text", "markdown"];

/// Canonical metadata fields and their alias probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Id,
    Title,
    LastUpdated,
    DepotName,
    PageType,
    Url,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Id,
        CanonicalField::Title,
        CanonicalField::LastUpdated,
        CanonicalField::DepotName,
        CanonicalField::PageType,
        CanonicalField::Url,
    ];

    /// Keys probed for this field, highest precedence first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["document-chunk-id", "id", "documentChunkId"],
            Self::Title => &["title", "displayName"],
            Self::LastUpdated => &["last-updated-at", "lastUpdated", "lastModified", "updatedAt"],
            Self::DepotName => &["depot-name", "depotName", "depot", "source"],
            Self::PageType => &["page-type", "pageType", "type", "contentType"],
            Self::Url => &["url", "link", "href"],
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::LastUpdated => "lastUpdated",
            Self::DepotName => "depotName",
            Self::PageType => "pageType",
            Self::Url => "url",
        }
    }
}

/// Generic key-value lookup over a backend record.
pub trait FieldSource {
    /// Scalar value stored under `key`, rendered as text.
    ///
    /// Returns `None` when the key is missing, null, blank, or not a scalar.
    fn text(&self, key: &str) -> Option<String>;

    /// Nested record stored under `key`, if that value is itself a record.
    fn child(&self, key: &str) -> Option<&Self>;

    /// First present value among `aliases`.
    fn first_text(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            let value = self.text(alias);
            if value.is_some() {
                trace!(alias, "alias matched");
            }
            value
        })
    }
}

impl FieldSource for JsonValue {
    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            JsonValue::String(s) if !s.trim().is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.get(key).filter(|v| v.is_object())
    }
}

/// Flat string records have no nesting.
impl FieldSource for BTreeMap<String, String> {
    fn text(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }

    fn child(&self, _key: &str) -> Option<&Self> {
        None
    }
}

/// Normalize a JSON payload into a canonical record.
pub fn normalize(payload: &JsonValue, requested_id: &DocumentChunkId) -> DocumentChunk {
    normalize_source(payload, requested_id)
}

/// Normalize any [`FieldSource`] into a canonical record.
pub fn normalize_source<S>(payload: &S, requested_id: &DocumentChunkId) -> DocumentChunk
where
    S: FieldSource + ?Sized,
{
    let record = payload.child(defaults::ENVELOPE_KEY).unwrap_or(payload);
    let source = record.child(defaults::METADATA_KEY).unwrap_or(record);

    let lookup = |field: CanonicalField| {
        let value = source.first_text(field.aliases());
        if value.is_none() {
            trace!(field = field.name(), "no alias present");
        }
        value
    };

    let metadata = CanonicalMetadata {
        id: lookup(CanonicalField::Id).unwrap_or_else(|| requested_id.to_string()),
        title: lookup(CanonicalField::Title)
            .unwrap_or_else(|| defaults::UNTITLED_DOCUMENT.to_string()),
        last_updated: lookup(CanonicalField::LastUpdated),
        depot_name: lookup(CanonicalField::DepotName),
        page_type: lookup(CanonicalField::PageType),
        url: lookup(CanonicalField::Url),
    };

    let content = record
        .first_text(CONTENT_ALIASES)
        .unwrap_or_else(|| defaults::NO_CONTENT.to_string());

    DocumentChunk { metadata, content }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> DocumentChunkId {
        DocumentChunkId::new(s)
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let chunk = normalize(&json!({}), &id("x"));
        assert_eq!(chunk.metadata.id, "x");
        assert_eq!(chunk.metadata.title, "Untitled Document");
        assert_eq!(chunk.metadata.last_updated, None);
        assert_eq!(chunk.metadata.depot_name, None);
        assert_eq!(chunk.metadata.page_type, None);
        assert_eq!(chunk.metadata.url, None);
        assert_eq!(chunk.content, "No content available");
    }

    #[test]
    fn test_enveloped_nested_payload() {
        let payload = json!({
            "itemSpec": {
                "metadata": {
                    "document-chunk-id": "doc-12345-chunk-67890",
                    "title": "Intro"
                },
                "content": "Hello"
            }
        });
        let chunk = normalize(&payload, &id("doc-12345-chunk-67890"));
        assert_eq!(chunk.metadata.id, "doc-12345-chunk-67890");
        assert_eq!(chunk.metadata.title, "Intro");
        assert_eq!(chunk.metadata.url, None);
        assert_eq!(chunk.content, "Hello");
    }

    #[test]
    fn test_envelope_is_transparent() {
        let inner = json!({
            "metadata": { "id": "a", "title": "T", "depot-name": "d" },
            "content": "x"
        });
        let wrapped = json!({ "itemSpec": inner.clone() });
        assert_eq!(normalize(&wrapped, &id("r")), normalize(&inner, &id("r")));
    }

    #[test]
    fn test_hyphenated_id_wins_over_plain_id() {
        let payload = json!({ "metadata": { "id": "plain", "document-chunk-id": "hyphen" } });
        assert_eq!(normalize(&payload, &id("r")).metadata.id, "hyphen");
    }

    #[test]
    fn test_flat_camel_case_record() {
        let payload = json!({
            "documentChunkId": "c-1",
            "displayName": "Camel",
            "lastModified": "2024-05-01T10:00:00Z",
            "depot": "learn",
            "contentType": "article",
            "href": "https://example.com/c-1",
            "body": "from body"
        });
        let chunk = normalize(&payload, &id("r"));
        assert_eq!(chunk.metadata.id, "c-1");
        assert_eq!(chunk.metadata.title, "Camel");
        assert_eq!(
            chunk.metadata.last_updated.as_deref(),
            Some("2024-05-01T10:00:00Z")
        );
        assert_eq!(chunk.metadata.depot_name.as_deref(), Some("learn"));
        assert_eq!(chunk.metadata.page_type.as_deref(), Some("article"));
        assert_eq!(
            chunk.metadata.url.as_deref(),
            Some("https://example.com/c-1")
        );
        assert_eq!(chunk.content, "from body");
    }

    #[test]
    fn test_content_is_read_from_record_not_metadata() {
        let payload = json!({
            "metadata": { "content": "metadata content" },
            "markdown": "# record content"
        });
        assert_eq!(normalize(&payload, &id("r")).content, "# record content");
    }

    #[test]
    fn test_metadata_is_not_read_from_record_when_nested() {
        let payload = json!({
            "title": "record title",
            "metadata": { "url": "u" }
        });
        let chunk = normalize(&payload, &id("r"));
        assert_eq!(chunk.metadata.title, "Untitled Document");
        assert_eq!(chunk.metadata.url.as_deref(), Some("u"));
    }

    #[test]
    fn test_blank_and_null_fall_through() {
        let payload = json!({
            "document-chunk-id": "",
            "id": null,
            "documentChunkId": "third",
            "content": "   ",
            "body": null,
            "text": "real text"
        });
        let chunk = normalize(&payload, &id("r"));
        assert_eq!(chunk.metadata.id, "third");
        assert_eq!(chunk.content, "real text");
    }

    #[test]
    fn test_blank_everything_never_yields_empty() {
        let payload = json!({ "id": " ", "content": "" });
        let chunk = normalize(&payload, &id("req"));
        assert_eq!(chunk.metadata.id, "req");
        assert_eq!(chunk.content, "No content available");
    }

    #[test]
    fn test_numeric_id_rendered_as_text() {
        let payload = json!({ "id": 42 });
        assert_eq!(normalize(&payload, &id("r")).metadata.id, "42");
    }

    #[test]
    fn test_non_object_values_are_absent() {
        let payload = json!({ "title": ["a"], "content": { "nested": true } });
        let chunk = normalize(&payload, &id("r"));
        assert_eq!(chunk.metadata.title, "Untitled Document");
        assert_eq!(chunk.content, "No content available");
    }

    #[test]
    fn test_non_object_envelope_is_ignored() {
        let payload = json!({ "itemSpec": "oops", "title": "kept" });
        assert_eq!(normalize(&payload, &id("r")).metadata.title, "kept");
    }

    #[test]
    fn test_non_object_payload() {
        for payload in [json!(null), json!([1, 2]), json!("text"), json!(7)] {
            let chunk = normalize(&payload, &id("r"));
            assert_eq!(chunk.metadata.id, "r");
            assert_eq!(chunk.content, "No content available");
        }
    }

    #[test]
    fn test_flat_map_source() {
        let mut map = BTreeMap::new();
        map.insert("page-type".to_string(), "reference".to_string());
        map.insert("pageType".to_string(), "ignored".to_string());
        map.insert("text".to_string(), "plain".to_string());
        map.insert("id".to_string(), "".to_string());

        let chunk = normalize_source(&map, &id("m"));
        assert_eq!(chunk.metadata.id, "m");
        assert_eq!(chunk.metadata.page_type.as_deref(), Some("reference"));
        assert_eq!(chunk.content, "plain");
    }

    #[test]
    fn test_every_field_has_aliases() {
        for field in CanonicalField::ALL {
            assert!(!field.aliases().is_empty(), "{:?}", field);
        }
    }

    #[test]
    fn test_alias_precedence_per_field() {
        for field in CanonicalField::ALL {
            let aliases = field.aliases();
            let mut record = serde_json::Map::new();
            for (rank, alias) in aliases.iter().enumerate().rev() {
                record.insert(alias.to_string(), json!(format!("v{}", rank)));
            }
            let source = JsonValue::Object(record);
            assert_eq!(
                source.first_text(aliases).as_deref(),
                Some("v0"),
                "{:?} should prefer {}",
                field,
                aliases[0]
            );
        }
    }
}
