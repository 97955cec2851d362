//! Type model errors

use thiserror::Error;

/// Errors raised while parsing a qualified name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    /// The input was empty or only whitespace
    #[error("Qualified name cannot be empty")]
    Empty,

    /// A `::` separated segment was empty (e.g. `app::::Person`)
    #[error("Empty segment in qualified name: {name}")]
    EmptySegment {
        /// The offending input
        name: String,
    },

    /// A segment is not a valid identifier
    #[error("Invalid segment '{segment}' in qualified name: {name}")]
    InvalidSegment {
        /// The offending input
        name: String,
        /// The segment that failed validation
        segment: String,
    },
}
