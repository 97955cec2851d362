//! Generated artifacts and where they go

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// What an artifact is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    /// `<name>_factory.rs`
    FactorySource,
    /// `<name>_adapter.rs`
    AdapterSource,
    /// `<Name>_Builtins.d.ts`
    DeclarationFile,
    /// `<Name>_Builtins.mjs`
    BuiltinsModule,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::FactorySource => "factory",
            ArtifactKind::AdapterSource => "adapter",
            ArtifactKind::DeclarationFile => "declarations",
            ArtifactKind::BuiltinsModule => "builtins module",
        };
        write!(f, "{}", name)
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Target identifier, a file name relative to the output location
    pub target: String,
    /// Full file contents
    pub contents: String,
}

impl GeneratedArtifact {
    /// Create an artifact
    pub fn new(kind: ArtifactKind, target: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            contents: contents.into(),
        }
    }
}

/// Errors raised by artifact writers
#[derive(Debug, Error)]
pub enum WriteError {
    /// The same target was written twice by one writer
    #[error("Artifact target written twice: {0}")]
    DuplicateTarget(String),

    /// Filesystem failure
    #[error("Failed to write {path}: {source}")]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Destination for generated artifacts
pub trait ArtifactWriter: Send + Sync {
    /// Persist one artifact
    fn write(&self, artifact: GeneratedArtifact) -> Result<(), WriteError>;
}

/// Writes artifacts below an output directory.
///
/// Files left by an earlier run are overwritten; writing the same target
/// twice through one writer is an error.
#[derive(Debug)]
pub struct FsArtifactWriter {
    out_dir: PathBuf,
    written: Mutex<BTreeSet<String>>,
}

impl FsArtifactWriter {
    /// A writer rooted at `out_dir` (created on first write)
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Mutex::new(BTreeSet::new()),
        }
    }

    /// Output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl ArtifactWriter for FsArtifactWriter {
    fn write(&self, artifact: GeneratedArtifact) -> Result<(), WriteError> {
        if !self.written.lock().insert(artifact.target.clone()) {
            return Err(WriteError::DuplicateTarget(artifact.target));
        }

        let path = self.out_dir.join(&artifact.target);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, artifact.contents.as_bytes())
            .map_err(|source| WriteError::Io { path, source })
    }
}

/// Keeps artifacts in memory, keyed by target
#[derive(Debug, Default)]
pub struct MemoryArtifactWriter {
    artifacts: Mutex<BTreeMap<String, GeneratedArtifact>>,
}

impl MemoryArtifactWriter {
    /// An empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a written target
    pub fn get(&self, target: &str) -> Option<String> {
        self.artifacts.lock().get(target).map(|a| a.contents.clone())
    }

    /// Written targets, sorted
    pub fn targets(&self) -> Vec<String> {
        self.artifacts.lock().keys().cloned().collect()
    }

    /// Number of written artifacts
    pub fn len(&self) -> usize {
        self.artifacts.lock().len()
    }

    /// Whether nothing was written
    pub fn is_empty(&self) -> bool {
        self.artifacts.lock().is_empty()
    }
}

impl ArtifactWriter for MemoryArtifactWriter {
    fn write(&self, artifact: GeneratedArtifact) -> Result<(), WriteError> {
        let mut artifacts = self.artifacts.lock();
        if artifacts.contains_key(&artifact.target) {
            return Err(WriteError::DuplicateTarget(artifact.target));
        }
        artifacts.insert(artifact.target.clone(), artifact);
        Ok(())
    }
}

/// `CalculatorService` → `calculator_service`, `HTTPClient` → `http_client`
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Target identifier of a factory
pub fn factory_target(interface: &str) -> String {
    format!("{}_factory.rs", snake_case(interface))
}

/// Target identifier of an adapter
pub fn adapter_target(interface: &str) -> String {
    format!("{}_adapter.rs", snake_case(interface))
}

/// Target identifier of a declaration file
pub fn declaration_target(interface: &str) -> String {
    format!("{}_Builtins.d.ts", interface)
}

/// Target identifier of a builtins module
pub fn builtins_module_target(interface: &str) -> String {
    format!("{}_Builtins.mjs", interface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("Calculator"), "calculator");
        assert_eq!(snake_case("CalculatorService"), "calculator_service");
        assert_eq!(snake_case("HTTPClient"), "http_client");
        assert_eq!(snake_case("Converter2Way"), "converter2_way");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_targets() {
        assert_eq!(factory_target("DataProcessor"), "data_processor_factory.rs");
        assert_eq!(adapter_target("DataProcessor"), "data_processor_adapter.rs");
        assert_eq!(declaration_target("DataProcessor"), "DataProcessor_Builtins.d.ts");
        assert_eq!(builtins_module_target("DataProcessor"), "DataProcessor_Builtins.mjs");
    }

    #[test]
    fn test_memory_writer_rejects_duplicates() {
        let writer = MemoryArtifactWriter::new();
        writer
            .write(GeneratedArtifact::new(ArtifactKind::FactorySource, "a.rs", "one"))
            .unwrap();
        let err = writer
            .write(GeneratedArtifact::new(ArtifactKind::FactorySource, "a.rs", "two"))
            .unwrap_err();
        assert!(matches!(err, WriteError::DuplicateTarget(ref t) if t == "a.rs"));
        assert_eq!(writer.get("a.rs").as_deref(), Some("one"));
    }
}
