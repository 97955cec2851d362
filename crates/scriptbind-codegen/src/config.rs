//! Generator configuration (scriptbind.toml)
//!
//! The configuration is the explicit input of a generation run: which crate
//! to scan, which traits to generate for, and the policies that shape the
//! output.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scriptbind_types::QualifiedName;

use crate::mapper::BeanPolicy;

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// The crate whose sources declare the interfaces
    #[serde(rename = "crate")]
    pub krate: CrateConfig,

    /// Output policies
    #[serde(default)]
    pub generator: GeneratorOptions,

    /// Explicitly configured interfaces
    #[serde(default, rename = "interface")]
    pub interfaces: Vec<InterfaceConfig>,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,
}

/// Crate information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct CrateConfig {
    /// Crate name; the root segment of every qualified name
    pub name: String,

    /// Source directory (defaults to "src")
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
}

/// Order of the builtins section in declaration files
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinsOrder {
    /// Member-listing order of the context type
    #[default]
    Declaration,
    /// Sorted by method name
    Lexicographic,
}

/// Output policies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GeneratorOptions {
    /// Namespace segments a type must share with the interface to count as a
    /// bean; 0 disables bean detection
    #[serde(default = "default_bean_segments")]
    pub bean_namespace_segments: usize,

    /// Builtins ordering
    #[serde(default)]
    pub builtins_order: BuiltinsOrder,

    /// Scan sources for `#[script_interface]` traits
    #[serde(default = "default_discover")]
    pub discover: bool,
}

/// One interface to generate for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InterfaceConfig {
    /// Qualified trait path, e.g. `app::scripts::Calculator`
    pub path: String,

    /// Qualified context type path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Static script location; enables the adapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Method names to leave out of every generated surface
    #[serde(default)]
    pub excluded: Vec<String>,

    /// Script proxy type name (defaults to `<Trait>Proxy`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_bean_segments() -> usize {
    2
}

fn default_discover() -> bool {
    true
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            bean_namespace_segments: default_bean_segments(),
            builtins_order: BuiltinsOrder::default(),
            discover: default_discover(),
        }
    }
}

impl GeneratorOptions {
    /// The bean classification policy these options describe
    pub fn bean_policy(&self) -> BeanPolicy {
        match self.bean_namespace_segments {
            0 => BeanPolicy::Disabled,
            segments => BeanPolicy::SharedNamespace { segments },
        }
    }
}

impl GeneratorConfig {
    /// A configuration for `crate_name` with default options and no
    /// explicitly configured interfaces
    pub fn new(crate_name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            krate: CrateConfig {
                name: crate_name.into(),
                source_dir: default_source_dir(),
            },
            generator: GeneratorOptions::default(),
            interfaces: Vec::new(),
            root: root.into(),
        }
    }

    /// Parse a configuration file; relative paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    /// Parse a configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: GeneratorConfig = toml::from_str(content)?;
        config.root = PathBuf::from(".");
        config.validate()?;
        Ok(config)
    }

    /// Validate names and paths
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.krate.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "Crate name cannot be empty".to_string(),
            ));
        }
        if QualifiedName::parse(&self.krate.name)
            .map(|name| name.segments().len() != 1)
            .unwrap_or(true)
        {
            return Err(ConfigError::ValidationError(format!(
                "Invalid crate name: {}. Use the crate's Rust identifier (underscores, not hyphens)",
                self.krate.name
            )));
        }

        let mut seen = BTreeSet::new();
        for interface in &self.interfaces {
            interface.validate()?;
            if !seen.insert(interface.path.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Interface configured twice: {}",
                    interface.path
                )));
            }
        }

        Ok(())
    }

    /// Absolute (or root-relative) source directory
    pub fn source_root(&self) -> PathBuf {
        self.root.join(&self.krate.source_dir)
    }
}

impl InterfaceConfig {
    /// Configure an interface by its qualified path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Validate this entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        QualifiedName::parse(&self.path).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid interface path: {}", e))
        })?;

        if let Some(context) = &self.context {
            QualifiedName::parse(context).map_err(|e| {
                ConfigError::ValidationError(format!(
                    "Invalid context path for {}: {}",
                    self.path, e
                ))
            })?;
        }

        if let Some(location) = &self.location {
            if location.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Empty script location for {}",
                    self.path
                )));
            }
        }

        if self.excluded.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Empty excluded member name for {}",
                self.path
            )));
        }

        if let Some(proxy) = &self.proxy {
            let valid = QualifiedName::parse(proxy)
                .map(|name| name.segments().len() == 1)
                .unwrap_or(false);
            if !valid {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid proxy type name for {}: {}",
                    self.path, proxy
                )));
            }
        }

        Ok(())
    }
}
