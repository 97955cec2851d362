//! `scriptbind check`: run generation in memory and report diagnostics.

use std::path::Path;

use scriptbind_codegen::{Generator, MemoryArtifactWriter};
use termcolor::ColorChoice;

use crate::output::StyledOutput;

pub fn execute(config: &Path, color: ColorChoice) -> anyhow::Result<bool> {
    let config = super::load_config(config)?;
    let report = Generator::new(config).generate(&MemoryArtifactWriter::new());

    let mut out = StyledOutput::new(color);
    out.diagnostics(&report.diagnostics);
    out.summary(&report);
    Ok(!report.has_errors())
}
