//! Source type descriptors and the structural target types they map onto

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;

/// Built-in scalar kinds of the host language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl PrimitiveKind {
    /// Look up a primitive by its Rust spelling
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => PrimitiveKind::Bool,
            "char" => PrimitiveKind::Char,
            "i8" => PrimitiveKind::I8,
            "i16" => PrimitiveKind::I16,
            "i32" => PrimitiveKind::I32,
            "i64" => PrimitiveKind::I64,
            "i128" => PrimitiveKind::I128,
            "isize" => PrimitiveKind::Isize,
            "u8" => PrimitiveKind::U8,
            "u16" => PrimitiveKind::U16,
            "u32" => PrimitiveKind::U32,
            "u64" => PrimitiveKind::U64,
            "u128" => PrimitiveKind::U128,
            "usize" => PrimitiveKind::Usize,
            "f32" => PrimitiveKind::F32,
            "f64" => PrimitiveKind::F64,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this is the boolean primitive
    pub fn is_bool(self) -> bool {
        self == PrimitiveKind::Bool
    }
}

/// Wrapper ("boxed") numeric kinds: `NonZeroU32`, `Wrapping<i64>`,
/// `AtomicUsize`, decimal types and the like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// Integer-valued wrapper
    Integer,
    /// Floating point or decimal wrapper
    Float,
}

/// Classification of one host type, as produced by the metadata extractor.
///
/// Building a descriptor never fails: anything the extractor does not
/// recognize becomes [`TypeDescriptor::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum TypeDescriptor {
    /// No value (`()`)
    Void,
    /// Built-in scalar
    Primitive(PrimitiveKind),
    /// Wrapper numeric
    Numeric(NumericKind),
    /// Wrapper boolean (`AtomicBool`)
    Boolean,
    /// Text (`String`, `str`)
    Text,
    /// Date/time value
    Temporal(QualifiedName),
    /// Fixed-size array `[T; N]`
    ArrayOf(Box<TypeDescriptor>),
    /// List/set-like collection, with its element type when declared
    SequenceOf(Option<Box<TypeDescriptor>>),
    /// Map-like collection with its declared type arguments
    RecordOf(Vec<TypeDescriptor>),
    /// Any other named type; may be a bean
    Reference(QualifiedName),
    /// Unrecognized shape
    Unknown,
}

impl TypeDescriptor {
    /// Shorthand for `SequenceOf(Some(element))`
    pub fn sequence_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::SequenceOf(Some(Box::new(element)))
    }

    /// Shorthand for `ArrayOf(element)`
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::ArrayOf(Box::new(element))
    }

    /// Shorthand for a two-argument `RecordOf`
    pub fn record_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::RecordOf(vec![key, value])
    }

    /// Whether this is the void descriptor
    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }
}

/// A type in the script language's structural type syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TsType {
    /// `void`
    Void,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `string`
    String,
    /// `T[]`
    Array(Box<TsType>),
    /// `Record<K, V>`
    Record(Box<TsType>, Box<TsType>),
    /// `Record<string, any>`
    UntypedRecord,
    /// A declared bean interface, by simple name
    Bean(String),
    /// `any`
    Any,
}

impl TsType {
    /// Shorthand for `Array(element)`
    pub fn array(element: TsType) -> Self {
        TsType::Array(Box::new(element))
    }

    /// Shorthand for `Record(key, value)`
    pub fn record(key: TsType, value: TsType) -> Self {
        TsType::Record(Box::new(key), Box::new(value))
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Void => write!(f, "void"),
            TsType::Number => write!(f, "number"),
            TsType::Boolean => write!(f, "boolean"),
            TsType::String => write!(f, "string"),
            TsType::Array(element) => write!(f, "{}[]", element),
            TsType::Record(key, value) => write!(f, "Record<{}, {}>", key, value),
            TsType::UntypedRecord => write!(f, "Record<string, any>"),
            TsType::Bean(name) => write!(f, "{}", name),
            TsType::Any => write!(f, "any"),
        }
    }
}
