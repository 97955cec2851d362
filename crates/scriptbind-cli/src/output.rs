//! Colored diagnostic output.
//!
//! Respects `NO_COLOR` and the `--color` flag.

use std::io::Write;

use scriptbind_codegen::{Diagnostic, GenerationReport, Severity};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// One line per diagnostic on stderr, in report order.
    pub fn diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            let (label, color) = match diagnostic.severity {
                Severity::Warning => ("warning", Color::Yellow),
                Severity::Error => ("error", Color::Red),
            };
            let _ = self
                .stderr
                .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
            let _ = write!(self.stderr, "{}", label);
            let _ = self.stderr.reset();
            match &diagnostic.interface {
                Some(interface) => {
                    let _ = writeln!(self.stderr, ": {}: {}", interface, diagnostic.message);
                }
                None => {
                    let _ = writeln!(self.stderr, ": {}", diagnostic.message);
                }
            }
        }
    }

    pub fn summary(&mut self, report: &GenerationReport) {
        let errors = report.errors().count();
        let warnings = report.warnings().count();
        let color = if errors > 0 { Color::Red } else { Color::Green };
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stdout, "{}", if errors > 0 { "failed" } else { "done" });
        let _ = self.stdout.reset();
        let _ = writeln!(
            self.stdout,
            ": {} artifact(s), {} error(s), {} warning(s)",
            report.written.len(),
            errors,
            warnings
        );
    }
}
