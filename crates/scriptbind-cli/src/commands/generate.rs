//! `scriptbind generate`: write every artifact into the output directory.

use std::path::Path;

use scriptbind_codegen::{FsArtifactWriter, Generator};
use termcolor::ColorChoice;

use crate::output::StyledOutput;

pub fn execute(config: &Path, out_dir: &Path, color: ColorChoice) -> anyhow::Result<bool> {
    let config = super::load_config(config)?;
    let writer = FsArtifactWriter::new(out_dir);
    let report = Generator::new(config).generate(&writer);

    let mut out = StyledOutput::new(color);
    out.diagnostics(&report.diagnostics);
    for target in &report.written {
        println!("  wrote {}", out_dir.join(target).display());
    }
    out.summary(&report);
    Ok(!report.has_errors())
}
