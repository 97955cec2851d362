//! Error types for script loading

use std::path::PathBuf;

/// Errors raised while locating or reading a script library
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// No candidate path held the script
    #[error("script library '{location}' not found (searched: {})", format_searched(.searched))]
    NotFound {
        /// Location as written on the interface
        location: String,
        /// Every path that was tried, in order
        searched: Vec<PathBuf>,
    },

    /// The script exists but could not be read
    #[error("failed to read script library {}: {source}", .path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
