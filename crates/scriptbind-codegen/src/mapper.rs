//! Host type → structural type mapping
//!
//! The mapping is total: every [`TypeDescriptor`] maps to exactly one
//! [`TsType`], unrecognized shapes degrade to `any`. A mapper instance
//! belongs to one interface's generation run and accumulates the bean
//! types it meets along the way.

use rustc_hash::FxHashSet;
use scriptbind_types::{QualifiedName, TsType, TypeDescriptor};

/// Decides which named types are beans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeanPolicy {
    /// A type is a bean when the first `segments` segments of its namespace
    /// equal those of the interface's namespace.
    ///
    /// Coarse on purpose: unrelated types sharing a root namespace are
    /// classified as beans, and types in a namespace shorter than `segments`
    /// never are.
    SharedNamespace {
        /// Number of leading namespace segments compared
        segments: usize,
    },
    /// No type is a bean; every named type maps to `any`
    Disabled,
}

impl Default for BeanPolicy {
    fn default() -> Self {
        BeanPolicy::SharedNamespace { segments: 2 }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Depth {
    /// Beans render by name and are recorded
    Top,
    /// Beans render as `any`
    Nested,
}

/// Maps descriptors for one interface and records the beans it meets
#[derive(Debug)]
pub struct TypeMapper {
    policy: BeanPolicy,
    interface_namespace: Vec<String>,
    beans: Vec<QualifiedName>,
    seen: FxHashSet<QualifiedName>,
}

impl TypeMapper {
    /// Create a mapper for the interface named `interface`
    pub fn new(interface: &QualifiedName, policy: BeanPolicy) -> Self {
        Self {
            policy,
            interface_namespace: interface.namespace().to_vec(),
            beans: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    /// Map a type, recording any bean it refers to
    pub fn map(&mut self, ty: &TypeDescriptor) -> TsType {
        let mut found = Vec::new();
        let mapped = self.convert(ty, Depth::Top, &mut found);
        for bean in found {
            if self.seen.insert(bean.clone()) {
                self.beans.push(bean);
            }
        }
        mapped
    }

    /// Map a type with beans erased to `any`; records nothing
    pub fn map_depth_limited(&self, ty: &TypeDescriptor) -> TsType {
        self.convert(ty, Depth::Nested, &mut Vec::new())
    }

    /// `name: Type`, mapping (and recording) the type
    pub fn format_parameter(&mut self, name: &str, ty: &TypeDescriptor) -> String {
        format!("{}: {}", name, self.map(ty))
    }

    /// Beans recorded so far, in first-encountered order
    pub fn encountered_beans(&self) -> &[QualifiedName] {
        &self.beans
    }

    /// Whether `name` is classified as a bean for this interface
    pub fn is_custom_bean(&self, name: &QualifiedName) -> bool {
        match self.policy {
            BeanPolicy::Disabled => false,
            BeanPolicy::SharedNamespace { segments } => {
                let Some(prefix) = name.namespace_prefix(segments) else {
                    return false;
                };
                self.interface_namespace.len() >= segments
                    && self.interface_namespace[..segments] == *prefix
            }
        }
    }

    fn convert(&self, ty: &TypeDescriptor, depth: Depth, found: &mut Vec<QualifiedName>) -> TsType {
        match ty {
            TypeDescriptor::Void => TsType::Void,
            TypeDescriptor::Primitive(kind) if kind.is_bool() => TsType::Boolean,
            TypeDescriptor::Primitive(_) | TypeDescriptor::Numeric(_) => TsType::Number,
            TypeDescriptor::Boolean => TsType::Boolean,
            TypeDescriptor::Text | TypeDescriptor::Temporal(_) => TsType::String,
            TypeDescriptor::ArrayOf(element) => TsType::array(self.convert(element, depth, found)),
            TypeDescriptor::SequenceOf(Some(element)) => {
                TsType::array(self.convert(element, depth, found))
            }
            TypeDescriptor::SequenceOf(None) => TsType::array(TsType::Any),
            TypeDescriptor::RecordOf(args) if args.len() >= 2 => TsType::record(
                self.convert(&args[0], depth, found),
                self.convert(&args[1], depth, found),
            ),
            TypeDescriptor::RecordOf(_) => TsType::UntypedRecord,
            TypeDescriptor::Reference(name) => {
                if !self.is_custom_bean(name) {
                    return TsType::Any;
                }
                match depth {
                    Depth::Top => {
                        found.push(name.clone());
                        TsType::Bean(name.simple_name().to_string())
                    }
                    Depth::Nested => TsType::Any,
                }
            }
            TypeDescriptor::Unknown => TsType::Any,
        }
    }
}
