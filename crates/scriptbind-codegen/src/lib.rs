//! Scriptbind Code Generator
//!
//! Build-time generation for traits implemented by scripts:
//! - Metadata extraction from the crate's Rust sources (`syn`)
//! - Host type → structural type mapping, with bean detection
//! - Factory and adapter synthesis (`quote`, re-parsed with `syn`)
//! - TypeScript declaration files and builtins modules
//! - A batch driver with a parallel synthesis phase, usable from `build.rs`

pub mod adapter;
pub mod artifact;
pub mod beans;
pub mod config;
pub mod declaration;
pub mod error;
pub mod extract;
pub mod generator;
pub mod mapper;

pub use adapter::{synthesize_adapter, synthesize_factory};
pub use artifact::{
    ArtifactKind, ArtifactWriter, FsArtifactWriter, GeneratedArtifact, MemoryArtifactWriter,
    WriteError,
};
pub use beans::{synthesize_bean, synthesize_beans, BeanCatalog};
pub use config::{BuiltinsOrder, ConfigError, GeneratorConfig, GeneratorOptions, InterfaceConfig};
pub use declaration::{emit_declaration, DeclarationFile, FunctionSignature, InterfaceBlock, Member};
pub use error::GenerateError;
pub use extract::{ExtractError, ScriptInterfaceArgs, SourceIndex};
pub use generator::{
    generate_interface, BuildError, Builder, Diagnostic, GenerationReport, Generator,
    InterfacePlan, Severity,
};
pub use mapper::{BeanPolicy, TypeMapper};
