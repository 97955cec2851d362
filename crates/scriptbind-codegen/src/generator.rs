//! Batch driver
//!
//! A run goes through three phases:
//!
//! 1. **Plan** (calling thread): index the sources, merge configured and
//!    discovered interfaces, extract one self-contained [`InterfacePlan`]
//!    per interface.
//! 2. **Synthesize** (worker pool): [`generate_interface`] for every plan.
//!    Plans share nothing mutable; each run owns its own [`TypeMapper`].
//! 3. **Write** (calling thread): artifacts go to the writer in plan order.
//!
//! Failures are scoped to one interface (or one artifact) and reported as
//! [`Diagnostic`]s; only an unreadable source tree stops the run.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crossbeam::channel;
use scriptbind_types::{InterfaceDescriptor, QualifiedName};
use thiserror::Error;

use crate::adapter::{synthesize_adapter, synthesize_factory};
use crate::artifact::{
    adapter_target, builtins_module_target, declaration_target, factory_target, ArtifactKind,
    ArtifactWriter, FsArtifactWriter, GeneratedArtifact,
};
use crate::beans::BeanCatalog;
use crate::config::{ConfigError, GeneratorConfig, GeneratorOptions, InterfaceConfig};
use crate::declaration::emit_declaration;
use crate::error::GenerateError;
use crate::extract::{bean_catalog, ExtractError, SourceIndex};
use crate::mapper::TypeMapper;

/// Everything needed to generate one interface, detached from the syntax trees
#[derive(Debug, Clone)]
pub struct InterfacePlan {
    /// Crate the interface is declared in
    pub crate_name: String,
    /// The interface
    pub interface: InterfaceDescriptor,
    /// Beans of the whole crate
    pub catalog: Arc<BeanCatalog>,
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Output was produced but is probably not what was intended
    Warning,
    /// Output for an interface or artifact is missing
    Error,
}

/// A problem found during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Interface concerned, `None` for run-level problems
    pub interface: Option<String>,
    /// Description
    pub message: String,
}

impl Diagnostic {
    fn warning(interface: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            interface: interface.map(str::to_string),
            message: message.into(),
        }
    }

    fn error(interface: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            interface: interface.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.interface {
            Some(interface) => write!(f, "{}: {}: {}", level, interface, self.message),
            None => write!(f, "{}: {}", level, self.message),
        }
    }
}

/// Outcome of a run
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Targets written, in write order
    pub written: Vec<String>,
    /// Everything that went wrong
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    /// Whether any error diagnostic was raised
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Error diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    /// Warning diagnostics
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning)
    }
}

/// Runs generation for one configuration
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a generator
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every interface and hand the artifacts to `writer`
    pub fn generate(&self, writer: &dyn ArtifactWriter) -> GenerationReport {
        let mut report = GenerationReport::default();

        let index = match self.load_index() {
            Ok(index) => index,
            Err(e) => {
                tracing::error!("{}", e);
                report.diagnostics.push(Diagnostic::error(None, e.to_string()));
                return report;
            }
        };

        let plans = self.plan(&index, &mut report.diagnostics);
        drop(index);

        let results = synthesize_all(&plans, &self.config.generator);

        for (plan, result) in plans.iter().zip(results) {
            let interface = plan.interface.name.to_string();
            let artifacts = match result {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    tracing::warn!(interface = %interface, "{}", e);
                    report.diagnostics.push(Diagnostic::error(Some(interface.as_str()), e.to_string()));
                    continue;
                }
            };

            for artifact in artifacts {
                let target = artifact.target.clone();
                match writer.write(artifact) {
                    Ok(()) => {
                        tracing::debug!(target = %target, "wrote artifact");
                        report.written.push(target);
                    }
                    Err(e) => {
                        tracing::warn!(interface = %interface, "{}", e);
                        report.diagnostics.push(Diagnostic::error(Some(interface.as_str()), e.to_string()));
                    }
                }
            }
        }

        tracing::info!(
            interfaces = plans.len(),
            written = report.written.len(),
            errors = report.errors().count(),
            "generation finished"
        );
        report
    }

    /// Extract the descriptor of one interface, configured or discovered
    pub fn inspect(&self, path: &str) -> Result<InterfaceDescriptor, ExtractError> {
        let index = self.load_index()?;
        let wanted = QualifiedName::parse(path)
            .map_err(|_| ExtractError::InterfaceNotFound(path.to_string()))?;

        let (configs, errors) = self.interface_configs(&index, &mut Vec::new());
        if let Some(e) = errors.into_iter().find(|e| match e {
            ExtractError::InvalidAttribute { path: broken, .. } => {
                QualifiedName::parse(broken).ok().as_ref() == Some(&wanted)
            }
            _ => false,
        }) {
            return Err(e);
        }
        let config = configs
            .into_iter()
            .find(|config| QualifiedName::parse(&config.path).ok().as_ref() == Some(&wanted))
            .unwrap_or_else(|| InterfaceConfig::new(path));
        index.extract_interface(&config)
    }

    fn load_index(&self) -> Result<SourceIndex, ExtractError> {
        let source_root = self.config.source_root();
        tracing::info!(
            krate = %self.config.krate.name,
            dir = %source_root.display(),
            "indexing sources"
        );
        SourceIndex::load(&self.config.krate.name, &source_root)
    }

    /// Configured interfaces, then discovered ones not configured explicitly.
    /// Traits whose attribute could not be read come back as errors.
    fn interface_configs(
        &self,
        index: &SourceIndex,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Vec<InterfaceConfig>, Vec<ExtractError>) {
        let mut configs = self.config.interfaces.clone();
        if !self.config.generator.discover {
            return (configs, Vec::new());
        }

        let (discovered, errors) = index.discover_interfaces();
        for discovered in discovered {
            let duplicate = configs.iter().any(|configured| {
                QualifiedName::parse(&configured.path).ok()
                    == QualifiedName::parse(&discovered.path).ok()
            });
            if duplicate {
                let message = "configured in scriptbind.toml and annotated with #[script_interface]; using the configuration";
                tracing::warn!(interface = %discovered.path, "{}", message);
                diagnostics.push(Diagnostic::warning(Some(discovered.path.as_str()), message));
                continue;
            }
            configs.push(discovered);
        }
        (configs, errors)
    }

    fn plan(&self, index: &SourceIndex, diagnostics: &mut Vec<Diagnostic>) -> Vec<InterfacePlan> {
        let (configs, errors) = self.interface_configs(index, diagnostics);
        let failed = errors.len();
        for e in errors {
            let interface = match &e {
                ExtractError::InvalidAttribute { path, .. } => Some(path.clone()),
                _ => None,
            };
            tracing::warn!("{}", e);
            diagnostics.push(Diagnostic::error(interface.as_deref(), e.to_string()));
        }
        if configs.is_empty() {
            if failed == 0 {
                diagnostics.push(Diagnostic::warning(None, "no script interfaces found"));
            }
            return Vec::new();
        }

        let catalog = Arc::new(bean_catalog(index));
        let mut plans = Vec::with_capacity(configs.len());
        for config in &configs {
            match index.extract_interface(config) {
                Ok(interface) => {
                    for method in excluded_without_default(&interface) {
                        diagnostics.push(Diagnostic::warning(
                            Some(config.path.as_str()),
                            format!(
                                "excluded method '{}' has no default body; the generated adapter will not compile",
                                method
                            ),
                        ));
                    }
                    plans.push(InterfacePlan {
                        crate_name: self.config.krate.name.clone(),
                        interface,
                        catalog: Arc::clone(&catalog),
                    });
                }
                Err(e) => {
                    tracing::warn!(interface = %config.path, "{}", e);
                    diagnostics.push(Diagnostic::error(Some(config.path.as_str()), e.to_string()));
                }
            }
        }
        plans
    }
}

/// Excluded methods the adapter cannot leave out (only when it is generated)
fn excluded_without_default(interface: &InterfaceDescriptor) -> Vec<String> {
    if interface.script_location.is_none() {
        return Vec::new();
    }
    interface
        .excluded_methods()
        .filter(|method| !method.has_default)
        .map(|method| method.name.clone())
        .collect()
}

/// Produce every artifact of one interface
pub fn generate_interface(
    plan: &InterfacePlan,
    options: &GeneratorOptions,
) -> Result<Vec<GeneratedArtifact>, GenerateError> {
    let interface = &plan.interface;
    let simple_name = interface.simple_name();
    tracing::info!(interface = %interface.name, "generating");

    let mut artifacts = vec![GeneratedArtifact::new(
        ArtifactKind::FactorySource,
        factory_target(simple_name),
        synthesize_factory(interface, &plan.crate_name)?,
    )];

    if let Some(adapter) = synthesize_adapter(interface, &plan.crate_name)? {
        artifacts.push(GeneratedArtifact::new(
            ArtifactKind::AdapterSource,
            adapter_target(simple_name),
            adapter,
        ));
    }

    let mut mapper = TypeMapper::new(&interface.name, options.bean_policy());
    if let Some(declaration) =
        emit_declaration(interface, &plan.catalog, &mut mapper, options.builtins_order)?
    {
        artifacts.push(GeneratedArtifact::new(
            ArtifactKind::DeclarationFile,
            declaration_target(simple_name),
            declaration.to_string(),
        ));
        artifacts.push(GeneratedArtifact::new(
            ArtifactKind::BuiltinsModule,
            builtins_module_target(simple_name),
            declaration.render_builtins_module(),
        ));
    }

    for artifact in &artifacts {
        tracing::debug!(interface = %interface.name, kind = %artifact.kind, target = %artifact.target, "synthesized");
    }
    Ok(artifacts)
}

/// Run [`generate_interface`] for every plan on a scoped worker pool.
///
/// Results come back in plan order.
fn synthesize_all(
    plans: &[InterfacePlan],
    options: &GeneratorOptions,
) -> Vec<Result<Vec<GeneratedArtifact>, GenerateError>> {
    let workers = num_cpus::get().min(plans.len()).max(1);
    let (job_tx, job_rx) = channel::unbounded::<usize>();
    let (done_tx, done_rx) = channel::unbounded();

    for index in 0..plans.len() {
        // the receiver outlives this loop, send cannot fail
        let _ = job_tx.send(index);
    }
    drop(job_tx);

    let scope = crossbeam::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move |_| {
                for index in job_rx.iter() {
                    let _ = done_tx.send((index, generate_interface(&plans[index], options)));
                }
            });
        }
    });
    if let Err(panic) = scope {
        std::panic::resume_unwind(panic);
    }
    drop(done_tx);

    let mut results: Vec<_> = done_rx.iter().collect();
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}

/// Errors returned by [`Builder::generate`]
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No output directory was given and `OUT_DIR` is not set
    #[error("No output directory: call Builder::out_dir or run from a build script")]
    MissingOutDir,

    /// Generation reported errors
    #[error("Script interface generation failed:\n{}", format_diagnostics(.0))]
    Failed(Vec<Diagnostic>),
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry point for `build.rs`:
///
/// ```ignore
/// fn main() {
///     scriptbind_codegen::Builder::new()
///         .config_file("scriptbind.toml")
///         .generate()
///         .unwrap();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    config_file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

impl Builder {
    /// A builder reading `scriptbind.toml` and writing to `OUT_DIR`
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another configuration file
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Write artifacts somewhere other than `OUT_DIR`
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Run generation; any error diagnostic fails the build
    pub fn generate(self) -> Result<GenerationReport, BuildError> {
        let config_file = self
            .config_file
            .unwrap_or_else(|| PathBuf::from("scriptbind.toml"));
        let out_dir = match self.out_dir {
            Some(dir) => dir,
            None => std::env::var_os("OUT_DIR")
                .map(PathBuf::from)
                .ok_or(BuildError::MissingOutDir)?,
        };

        let config = GeneratorConfig::from_file(&config_file)?;
        println!("cargo:rerun-if-changed={}", config_file.display());
        println!("cargo:rerun-if-changed={}", config.source_root().display());

        let writer = FsArtifactWriter::new(out_dir);
        let report = Generator::new(config).generate(&writer);
        for warning in report.warnings() {
            println!("cargo:warning={}", warning);
        }
        if report.has_errors() {
            return Err(BuildError::Failed(report.errors().cloned().collect()));
        }
        Ok(report)
    }
}
