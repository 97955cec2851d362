//! Qualified type identities

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// A `::` separated type identity, e.g. `app::model::Person`.
///
/// The last segment is the simple name, everything before it is the
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Parse a `::` separated name
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let trimmed = name.trim().trim_start_matches("::");
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }

        let mut segments = Vec::new();
        for segment in trimmed.split("::") {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(NameError::EmptySegment {
                    name: name.to_string(),
                });
            }
            if !is_identifier(segment) {
                return Err(NameError::InvalidSegment {
                    name: name.to_string(),
                    segment: segment.to_string(),
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Build a name from already-split segments.
    ///
    /// Callers guarantee at least one segment; an empty list produces a name
    /// whose simple name is the empty string.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// All segments, namespace first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment
    pub fn simple_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Every segment except the last
    pub fn namespace(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, namespace)) => namespace,
            None => &[],
        }
    }

    /// The first `count` namespace segments, or `None` when the namespace is
    /// shorter than that (or `count` is zero).
    pub fn namespace_prefix(&self, count: usize) -> Option<&[String]> {
        let namespace = self.namespace();
        if count == 0 || namespace.len() < count {
            return None;
        }
        Some(&namespace[..count])
    }

    /// Append a segment
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Whether this name starts with the given segments
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.segments.len() >= prefix.len()
            && self.segments.iter().zip(prefix).all(|(a, b)| a == b)
    }

    /// Render as a Rust path usable from inside `crate_name`: a leading
    /// `crate_name` segment becomes `crate`.
    pub fn to_rust_path(&self, crate_name: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push_str("::");
            }
            if i == 0 && segment == crate_name && self.segments.len() > 1 {
                out.push_str("crate");
            } else {
                out.push_str(segment);
            }
        }
        out
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

fn is_identifier(segment: &str) -> bool {
    let segment = segment.strip_prefix("r#").unwrap_or(segment);
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
