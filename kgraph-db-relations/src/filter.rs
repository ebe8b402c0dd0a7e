//! Relation filter request and pagination

use crate::config::RelationsConfig;
use crate::error::{RelationError, Result};
use kgraph_db_core::sanitize_uri;
use serde::{Deserialize, Serialize};

/// Which end of an edge the anchor (`sourceUri`) must be
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Either end: the union of outgoing and incoming
    #[default]
    All,
    /// Anchor is the edge's destination
    Incoming,
    /// Anchor is the edge's source
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::All => "all",
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation filter request, as received on the wire.
///
/// `pageSize` and `offset` are signed so that negative input reaches
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type_uri: Option<String>,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl RelationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }

    pub fn destination(mut self, uri: impl Into<String>) -> Self {
        self.destination_uri = Some(uri.into());
        self
    }

    pub fn relation_type(mut self, uri: impl Into<String>) -> Self {
        self.relation_type_uri = Some(uri.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn page(mut self, page_size: i64, offset: i64) -> Self {
        self.page_size = Some(page_size);
        self.offset = Some(offset);
        self
    }

    /// Validate pagination against `config`.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn pagination(&self, config: &RelationsConfig) -> Result<Pagination> {
        let size = match self.page_size {
            None => config.default_page_size,
            Some(n) if n >= 1 && (n as u64) <= config.max_page_size as u64 => n as usize,
            Some(n) => {
                return Err(RelationError::invalid_pagination(format!(
                    "pageSize must be between 1 and {} (got {})",
                    config.max_page_size, n
                )))
            }
        };
        let offset = match self.offset {
            None => 0,
            Some(n) if n >= 0 => n as usize,
            Some(n) => {
                return Err(RelationError::invalid_pagination(format!(
                    "offset must be non-negative (got {})",
                    n
                )))
            }
        };
        Ok(Pagination { size, offset })
    }

    /// Criteria with every URI sanitized; blank search text is dropped.
    pub fn criteria(&self) -> Result<Criteria> {
        let clean = |uri: &Option<String>| -> Result<Option<String>> {
            uri.as_deref()
                .map(|u| sanitize_uri(u).map_err(RelationError::from_sanitize))
                .transpose()
        };
        Ok(Criteria {
            source: clean(&self.source_uri)?,
            destination: clean(&self.destination_uri)?,
            relation_type: clean(&self.relation_type_uri)?,
            direction: self.direction,
            search_text: self
                .search_text
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub size: usize,
    pub offset: usize,
}

/// Parsed filter criteria with full, unbracketed URIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub relation_type: Option<String>,
    pub direction: Direction,
    pub search_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_shape() {
        let filter: RelationFilter = serde_json::from_value(json!({
            "sourceUri": "http://example.org/e1",
            "direction": "outgoing",
            "searchText": "acme",
            "pageSize": 5,
            "offset": 10
        }))
        .unwrap();

        assert_eq!(
            filter,
            RelationFilter::new()
                .source("http://example.org/e1")
                .direction(Direction::Outgoing)
                .search("acme")
                .page(5, 10)
        );
    }

    #[test]
    fn test_direction_defaults_to_all() {
        let filter: RelationFilter = serde_json::from_value(json!({})).unwrap();
        assert_eq!(filter.direction, Direction::All);
    }

    #[test]
    fn test_pagination_defaults_and_bounds() {
        let config = RelationsConfig::default();
        assert_eq!(
            RelationFilter::new().pagination(&config).unwrap(),
            Pagination { size: 20, offset: 0 }
        );
        assert_eq!(
            RelationFilter::new().page(100, 3).pagination(&config).unwrap(),
            Pagination { size: 100, offset: 3 }
        );

        for (size, offset) in [(0, 0), (101, 0), (-1, 0), (10, -1)] {
            let err = RelationFilter::new()
                .page(size, offset)
                .pagination(&config)
                .unwrap_err();
            assert!(
                matches!(err, RelationError::InvalidPagination { .. }),
                "size={} offset={}",
                size,
                offset
            );
        }
    }

    #[test]
    fn test_criteria_strips_brackets_and_blank_search() {
        let criteria = RelationFilter::new()
            .source("<http://example.org/e1>")
            .search("   ")
            .criteria()
            .unwrap();
        assert_eq!(criteria.source.as_deref(), Some("http://example.org/e1"));
        assert_eq!(criteria.search_text, None);
    }

    #[test]
    fn test_criteria_rejects_malformed_uri() {
        let err = RelationFilter::new()
            .relation_type("not a uri")
            .criteria()
            .unwrap_err();
        assert!(matches!(err, RelationError::InvalidIri(_)));
    }
}
