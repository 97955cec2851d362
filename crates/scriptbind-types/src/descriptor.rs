//! Immutable descriptors of script interfaces, context types and beans

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::exclusion::is_identity_method;
use crate::name::QualifiedName;
use crate::ty::TypeDescriptor;

/// How a method takes `self`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Receiver {
    /// `self`
    Value,
    /// `&self`
    Ref,
    /// `&mut self`
    RefMut,
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDescriptor {
    /// Parameter name (`arg{index}` when the source used a pattern)
    pub name: String,
    /// Classified type
    pub ty: TypeDescriptor,
    /// The type exactly as spelled in the host source
    pub rust_type: String,
}

/// One declared method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Parameters in declared order, receiver excluded
    pub params: Vec<ParamDescriptor>,
    /// Classified return type (the `T` of a `Result<T, E>` return)
    pub returns: TypeDescriptor,
    /// Declared error types (the `E` of a `Result<T, E>` return)
    #[serde(default)]
    pub errors: Vec<String>,
    /// Full return type spelling, `None` for `()`
    #[serde(default)]
    pub return_rust: Option<String>,
    /// Receiver, `None` for associated functions
    pub receiver: Option<Receiver>,
    /// Declared `async`
    #[serde(default)]
    pub is_async: bool,
    /// Generic parameter list spelling, e.g. `<T: Into<String>>`
    #[serde(default)]
    pub generics: Option<String>,
    /// Where clause spelling
    #[serde(default)]
    pub where_clause: Option<String>,
    /// Whether the declaring trait provides a body
    #[serde(default)]
    pub has_default: bool,
}

impl MethodDescriptor {
    /// A `&self` method with no host-specific details, mostly useful in tests
    pub fn new(name: impl Into<String>, params: Vec<ParamDescriptor>, returns: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            errors: Vec::new(),
            return_rust: None,
            receiver: Some(Receiver::Ref),
            is_async: false,
            generics: None,
            where_clause: None,
            has_default: false,
        }
    }
}

impl ParamDescriptor {
    /// Build a parameter
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, rust_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            rust_type: rust_type.into(),
        }
    }
}

/// A type whose public methods are callable from scripts ("builtins")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextTypeDescriptor {
    /// Type identity
    pub name: QualifiedName,
    /// Public instance methods in member-listing order
    pub methods: Vec<MethodDescriptor>,
}

/// A statically declared interface to be implemented by a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDescriptor {
    /// Trait identity
    pub name: QualifiedName,
    /// All declared methods in source order
    pub methods: Vec<MethodDescriptor>,
    /// Host functions available to the script
    #[serde(default)]
    pub context: Option<ContextTypeDescriptor>,
    /// Static script location; an adapter is generated when present
    #[serde(default)]
    pub script_location: Option<String>,
    /// Method names omitted from every generated surface
    #[serde(default)]
    pub excluded: BTreeSet<String>,
    /// Name of the script proxy type the runtime provides
    pub proxy: String,
}

impl InterfaceDescriptor {
    /// Interface simple name
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    /// Whether `name` may appear in generated output
    pub fn is_exposed(&self, name: &str) -> bool {
        !self.excluded.contains(name) && !is_identity_method(name)
    }

    /// Methods that appear in the adapter and the script contract
    pub fn exposed_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(move |m| self.is_exposed(&m.name))
    }

    /// Methods that were excluded by name (identity methods not included)
    pub fn excluded_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods
            .iter()
            .filter(move |m| self.excluded.contains(&m.name) && !is_identity_method(&m.name))
    }

    /// Context methods that appear as builtins
    pub fn builtins(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.context
            .iter()
            .flat_map(|context| context.methods.iter())
            .filter(move |m| self.is_exposed(&m.name))
    }
}

/// One bean property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name derived from the accessor
    pub name: String,
    /// Accessor return type
    pub ty: TypeDescriptor,
}

/// A composite type described by its accessor methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanDescriptor {
    /// Type identity
    pub name: QualifiedName,
    /// Properties, one per distinct name, first occurrence wins
    pub properties: Vec<PropertyDescriptor>,
}

impl BeanDescriptor {
    /// A bean with no properties
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            properties: Vec::new(),
        }
    }

    /// Add a property unless one with the same name already exists.
    ///
    /// Returns whether the property was added.
    pub fn push_property(&mut self, name: impl Into<String>, ty: TypeDescriptor) -> bool {
        let name = name.into();
        if self.properties.iter().any(|p| p.name == name) {
            return false;
        }
        self.properties.push(PropertyDescriptor { name, ty });
        true
    }
}
