//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile route patterns into literal / capture segments
//! - Match request paths segment-wise, binding captures by name
//!
//! # Design Decisions
//! - Case-sensitive literals, no trailing-slash normalization
//! - A capture matches any single segment and binds its raw text
//! - Equal segment count is required; no wildcards or optional segments

use std::collections::HashMap;

/// One component of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Segments starting with `:` become named captures;
    /// everything else is literal. A bare `:` is treated as a literal.
    pub fn parse(pattern: &str) -> Self {
        let segments = split(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Match a request path, binding capture segments verbatim.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

// Deliberately no empty-segment filtering: "/api/health/" and "/api/health"
// are different paths.
fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let pattern = PathPattern::parse("/api/health");
        assert!(pattern.matches("/api/health").is_some());
        assert!(pattern.matches("/api/Health").is_none());
        assert!(pattern.matches("/api/health/extra").is_none());
        assert!(pattern.matches("/api").is_none());
    }

    #[test]
    fn capture_binds_raw_segment() {
        let pattern = PathPattern::parse("/api/prompts/:type");
        let params = pattern.matches("/api/prompts/encouragement").unwrap();
        assert_eq!(params.get("type").map(String::as_str), Some("encouragement"));
    }

    #[test]
    fn capture_never_spans_segments() {
        let pattern = PathPattern::parse("/api/prompts/:type");
        assert!(pattern.matches("/api/prompts/a/b").is_none());
        assert!(pattern.matches("/api/prompts").is_none());
    }

    #[test]
    fn multiple_captures_bind_independently() {
        let pattern = PathPattern::parse("/api/:group/:item");
        let params = pattern.matches("/api/teacher/students").unwrap();
        assert_eq!(params.get("group").map(String::as_str), Some("teacher"));
        assert_eq!(params.get("item").map(String::as_str), Some("students"));
    }

    #[test]
    fn bare_colon_is_a_literal() {
        let pattern = PathPattern::parse("/api/:");
        assert!(pattern.matches("/api/:").is_some());
        assert!(pattern.matches("/api/x").is_none());
    }

    #[test]
    fn trailing_slash_is_significant() {
        let pattern = PathPattern::parse("/api/health");
        assert!(pattern.matches("/api/health/").is_none());
        assert!(PathPattern::parse("/api/health/")
            .matches("/api/health/")
            .is_some());
    }
}
