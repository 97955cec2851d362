//! Metadata extraction
//!
//! Turns a crate's Rust sources into descriptors: the script interface
//! traits, their context types and the bean catalog. Extraction works on
//! `syn` syntax trees and therefore runs on the calling thread; everything
//! it produces is plain owned data.

mod accessor;
mod attr;
mod index;
mod resolve;

use std::collections::BTreeSet;
use std::path::PathBuf;

use scriptbind_types::{ContextTypeDescriptor, InterfaceDescriptor, QualifiedName};
use thiserror::Error;

use crate::config::InterfaceConfig;

pub use accessor::{bean_catalog, property_name};
pub use attr::{is_script_interface, ScriptInterfaceArgs};
pub use index::{ImplEntry, SourceIndex, TraitEntry, TypeEntry};
pub use resolve::TypeResolver;

/// Errors raised while reading sources or extracting descriptors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A source file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid Rust
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The source directory could not be turned into a search pattern
    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// No trait with this qualified name exists in the scanned sources
    #[error("Interface trait not found: {0}")]
    InterfaceNotFound(String),

    /// The configured context type does not exist in the scanned sources
    #[error("Context type {context} of {interface} not found")]
    ContextNotFound {
        /// Interface whose context was requested
        interface: String,
        /// Configured context path
        context: String,
    },

    /// Malformed `#[script_interface(...)]` arguments
    #[error("Invalid #[script_interface] on {path}: {message}")]
    InvalidAttribute {
        /// Trait carrying the attribute
        path: String,
        /// Parser message
        message: String,
    },
}

impl SourceIndex {
    /// Describe the configured interface trait
    pub fn extract_interface(
        &self,
        config: &InterfaceConfig,
    ) -> Result<InterfaceDescriptor, ExtractError> {
        let name = QualifiedName::parse(&config.path)
            .map_err(|_| ExtractError::InterfaceNotFound(config.path.clone()))?;
        let entry = self
            .find_trait(&name)
            .ok_or_else(|| ExtractError::InterfaceNotFound(config.path.clone()))?;

        let resolver = TypeResolver::new(self, entry.module, index::type_params(&entry.item.generics));
        let methods = entry
            .item
            .items
            .iter()
            .filter_map(|item| match item {
                syn::TraitItem::Fn(method) => Some(resolver.method(&method.sig, method.default.is_some())),
                _ => None,
            })
            .collect::<Vec<_>>();

        let context = config
            .context
            .as_deref()
            .map(|context| self.extract_context(&name, context))
            .transpose()?;

        let proxy = config
            .proxy
            .clone()
            .unwrap_or_else(|| format!("{}Proxy", name.simple_name()));

        tracing::debug!(
            interface = %name,
            methods = methods.len(),
            context = context.is_some(),
            "extracted interface"
        );

        Ok(InterfaceDescriptor {
            name,
            methods,
            context,
            script_location: config.location.clone(),
            excluded: config.excluded.iter().cloned().collect::<BTreeSet<_>>(),
            proxy,
        })
    }

    /// Describe a context type: every method with a receiver from its `pub`
    /// inherent methods and its trait impls, in source order.
    pub fn extract_context(
        &self,
        interface: &QualifiedName,
        context: &str,
    ) -> Result<ContextTypeDescriptor, ExtractError> {
        let not_found = || ExtractError::ContextNotFound {
            interface: interface.to_string(),
            context: context.to_string(),
        };
        let name = QualifiedName::parse(context).map_err(|_| not_found())?;
        if !self.has_type(&name) {
            return Err(not_found());
        }

        let mut methods = Vec::new();
        for block in self.impls_of(&name) {
            let resolver = TypeResolver::new(self, block.module, block.generics.clone());
            for method in &block.methods {
                if !block.trait_impl && !matches!(method.vis, syn::Visibility::Public(_)) {
                    continue;
                }
                if method.sig.receiver().is_none() {
                    continue;
                }
                methods.push(resolver.method(&method.sig, true));
            }
        }

        tracing::debug!(context = %name, methods = methods.len(), "extracted context");
        Ok(ContextTypeDescriptor { name, methods })
    }

    /// Interface configurations for every trait carrying
    /// `#[script_interface]`, in source order.
    ///
    /// A malformed attribute only drops its own trait; the problem is
    /// returned alongside the traits that were read successfully.
    pub fn discover_interfaces(&self) -> (Vec<InterfaceConfig>, Vec<ExtractError>) {
        let mut found = Vec::new();
        let mut errors = Vec::new();
        for entry in self.traits() {
            let Some(attr) = entry.item.attrs.iter().find(|attr| is_script_interface(attr)) else {
                continue;
            };
            let args = match ScriptInterfaceArgs::from_attribute(attr) {
                Ok(args) => args,
                Err(e) => {
                    errors.push(ExtractError::InvalidAttribute {
                        path: entry.name.to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let resolver = TypeResolver::new(self, entry.module, Vec::new());
            found.push(InterfaceConfig {
                path: entry.name.to_string(),
                context: args.context.map(|path| resolver.resolve_path(&path).to_string()),
                location: args.location,
                excluded: args.excluded,
                proxy: args.proxy.map(|ident| ident.to_string()),
            });
            tracing::debug!(interface = %entry.name, "discovered #[script_interface]");
        }
        (found, errors)
    }
}
