//! Subcommand implementations

pub mod check;
pub mod generate;
pub mod inspect;

use anyhow::Context;
use scriptbind_codegen::GeneratorConfig;
use std::path::Path;

pub(crate) fn load_config(path: &Path) -> anyhow::Result<GeneratorConfig> {
    GeneratorConfig::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}
