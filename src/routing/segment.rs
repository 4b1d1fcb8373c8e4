//! URI segmentation and the dynamic-segment grammar.
//!
//! # Responsibilities
//! - Split request paths into ordered `/`-delimited segments
//! - Parse the `(name:type)` pattern grammar used in route URIs
//!
//! # Design Decisions
//! - Paths are normalized by dropping empty segments, so `/a/b/`,
//!   `a/b`, and `//a//b` all segment identically
//! - The grammar is hand-parsed; no regex in the matching path
//! - A segment that fails to parse as a pattern is a literal segment

use std::fmt;

/// Validation rule for a dynamic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRule {
    /// Live segment must be entirely numeric.
    Int,
    /// Live segment may be anything.
    Any,
}

impl SegmentRule {
    /// Whether a live path segment satisfies this rule.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            SegmentRule::Int => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            SegmentRule::Any => true,
        }
    }
}

/// A parsed `(name:type)` route segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPattern {
    pub name: String,
    pub rule: SegmentRule,
}

impl fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = match self.rule {
            SegmentRule::Int => "int",
            SegmentRule::Any => "any",
        };
        write!(f, "({}:{})", self.name, rule)
    }
}

impl SegmentPattern {
    /// Parse a route URI segment against the `(<name>:<type>)` grammar.
    ///
    /// `<name>` is alphanumeric, `<type>` is `int` or `any`. Anything
    /// else is not a pattern and the segment stays literal.
    pub fn parse(segment: &str) -> Option<SegmentPattern> {
        let inner = segment.strip_prefix('(')?.strip_suffix(')')?;
        let (name, rule) = inner.split_once(':')?;

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }

        let rule = match rule.to_ascii_lowercase().as_str() {
            "int" => SegmentRule::Int,
            "any" => SegmentRule::Any,
            _ => return None,
        };

        Some(SegmentPattern {
            name: name.to_string(),
            rule,
        })
    }
}

/// Split a URI path into its non-empty segments.
pub fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 1-indexed segment lookup, mirroring the declaration-side convention
/// where the first path segment is segment 1.
pub fn segment(path: &str, index: usize) -> Option<String> {
    if index == 0 {
        return None;
    }
    path.split('/')
        .filter(|s| !s.is_empty())
        .nth(index - 1)
        .map(str::to_string)
}

/// Normalize a route URI or request path to its canonical stored form.
pub fn normalize(path: &str) -> String {
    segments(path).join("/")
}
