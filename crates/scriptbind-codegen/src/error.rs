//! Per-interface generation errors

use thiserror::Error;

/// Errors that abort the artifacts of a single interface
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// Two distinct bean types render under the same simple name
    #[error("Bean name collision in {interface}: '{name}' refers to both {first} and {second}")]
    BeanNameCollision {
        /// Interface being generated
        interface: String,
        /// Colliding simple name
        name: String,
        /// First qualified name encountered
        first: String,
        /// Second qualified name encountered
        second: String,
    },

    /// A forwarded method has no `self` receiver
    #[error("Method {interface}::{method} has no receiver and cannot be forwarded to a script")]
    MissingReceiver {
        /// Interface being generated
        interface: String,
        /// Method name
        method: String,
    },

    /// A recorded host spelling no longer parses
    #[error("Invalid {what} '{spelling}' in {interface}: {message}")]
    InvalidSpelling {
        /// Interface being generated
        interface: String,
        /// What was being parsed (parameter type, return type, ...)
        what: &'static str,
        /// The spelling that failed
        spelling: String,
        /// Parser message
        message: String,
    },

    /// A synthesized source file failed to re-parse
    #[error("Generated {target} is not valid Rust: {message}")]
    InvalidOutput {
        /// Artifact target identifier
        target: String,
        /// Parser message
        message: String,
    },
}
