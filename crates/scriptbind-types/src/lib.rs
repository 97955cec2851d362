//! Scriptbind Type Model
//!
//! Language-neutral descriptors for script-backed interfaces, and the
//! structural type system the declaration files are written in.
//!
//! The descriptors are built once by the extractor in `scriptbind-codegen`
//! and are plain owned data afterwards, so they can be handed to worker
//! threads and printed as JSON.

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod exclusion;
pub mod name;
pub mod ty;

pub use descriptor::{
    BeanDescriptor, ContextTypeDescriptor, InterfaceDescriptor, MethodDescriptor,
    ParamDescriptor, PropertyDescriptor, Receiver,
};
pub use error::NameError;
pub use exclusion::{is_identity_method, IDENTITY_METHODS};
pub use name::QualifiedName;
pub use ty::{NumericKind, PrimitiveKind, TsType, TypeDescriptor};
