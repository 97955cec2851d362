//! Classification of `syn` types and signatures into descriptors

use quote::ToTokens;
use scriptbind_types::{
    MethodDescriptor, NumericKind, ParamDescriptor, PrimitiveKind, QualifiedName, Receiver,
    TypeDescriptor,
};
use syn::{FnArg, GenericArgument, Pat, PathArguments, ReturnType, Signature, Type};

use super::index::{path_segments, type_params, SourceIndex};

/// Alias chains deeper than this classify as `Unknown`
const MAX_ALIAS_DEPTH: usize = 8;

/// Classifies types written inside one module, with a set of generic
/// parameters in scope.
pub struct TypeResolver<'a> {
    index: &'a SourceIndex,
    module: usize,
    generics: Vec<String>,
}

impl<'a> TypeResolver<'a> {
    /// A resolver for `module` with the given type parameters in scope
    pub fn new(index: &'a SourceIndex, module: usize, generics: Vec<String>) -> Self {
        Self {
            index,
            module,
            generics,
        }
    }

    /// Classify a type; never fails
    pub fn classify(&self, ty: &Type) -> TypeDescriptor {
        self.classify_at_depth(ty, 0)
    }

    fn classify_at_depth(&self, ty: &Type, depth: usize) -> TypeDescriptor {
        match ty {
            Type::Reference(r) => self.classify_at_depth(&r.elem, depth),
            Type::Paren(p) => self.classify_at_depth(&p.elem, depth),
            Type::Group(g) => self.classify_at_depth(&g.elem, depth),
            Type::Tuple(t) if t.elems.is_empty() => TypeDescriptor::Void,
            Type::Array(a) => TypeDescriptor::array_of(self.classify_at_depth(&a.elem, depth)),
            Type::Slice(s) => TypeDescriptor::sequence_of(self.classify_at_depth(&s.elem, depth)),
            Type::Path(p) if p.qself.is_none() => self.classify_path(&p.path, depth),
            _ => TypeDescriptor::Unknown,
        }
    }

    fn classify_path(&self, path: &syn::Path, depth: usize) -> TypeDescriptor {
        let Some(last) = path.segments.last() else {
            return TypeDescriptor::Unknown;
        };
        let ident = last.ident.to_string();

        if path.segments.len() == 1 && path.leading_colon.is_none() {
            if ident == "Self" || self.generics.contains(&ident) {
                return TypeDescriptor::Unknown;
            }
            if let Some(kind) = PrimitiveKind::from_name(&ident) {
                return TypeDescriptor::Primitive(kind);
            }
            if ident == "str" {
                return TypeDescriptor::Text;
            }
        }

        let resolved = self.index.resolve(
            self.module,
            &path_segments(path),
            path.leading_colon.is_some(),
        );

        if let Some((module, target)) = self.index.alias(&resolved) {
            if depth >= MAX_ALIAS_DEPTH {
                return TypeDescriptor::Unknown;
            }
            return TypeResolver::new(self.index, module, Vec::new())
                .classify_at_depth(target, depth + 1);
        }
        if self.index.has_type(&resolved) {
            return TypeDescriptor::Reference(resolved);
        }

        let args = type_arguments(&last.arguments);
        match ident.as_str() {
            "Box" | "Rc" | "Arc" | "Cow" | "Option" => match args.last() {
                Some(inner) => self.classify_at_depth(inner, depth),
                None => TypeDescriptor::Unknown,
            },
            "String" | "str" => TypeDescriptor::Text,
            "Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "BinaryHeap"
            | "IndexSet" => TypeDescriptor::SequenceOf(
                args.first()
                    .map(|element| Box::new(self.classify_at_depth(element, depth))),
            ),
            "HashMap" | "BTreeMap" | "IndexMap" => TypeDescriptor::RecordOf(
                args.iter()
                    .map(|arg| self.classify_at_depth(arg, depth))
                    .collect(),
            ),
            "SystemTime" | "Instant" => TypeDescriptor::Temporal(resolved),
            _ if resolved.starts_with(&["chrono"]) || resolved.starts_with(&["time"]) => {
                TypeDescriptor::Temporal(resolved)
            }
            "AtomicBool" => TypeDescriptor::Boolean,
            "Wrapping" | "Saturating" | "BigInt" | "BigUint" => {
                TypeDescriptor::Numeric(NumericKind::Integer)
            }
            "Decimal" | "BigDecimal" => TypeDescriptor::Numeric(NumericKind::Float),
            name if name.starts_with("NonZero")
                || name.starts_with("AtomicI")
                || name.starts_with("AtomicU") =>
            {
                TypeDescriptor::Numeric(NumericKind::Integer)
            }
            _ => TypeDescriptor::Reference(resolved),
        }
    }

    /// Split a return type: the `T` of `Result<T, E>` plus the spelled
    /// error types, or the type itself with no errors.
    pub fn classify_return(&self, ty: &Type) -> (TypeDescriptor, Vec<String>) {
        if let Type::Path(p) = ty {
            if let Some(last) = p.path.segments.last() {
                if last.ident == "Result" {
                    let args = type_arguments(&last.arguments);
                    match args.as_slice() {
                        [ok, err] => return (self.classify(ok), vec![spelling(*err)]),
                        [ok] => return (self.classify(ok), Vec::new()),
                        _ => {}
                    }
                }
            }
        }
        (self.classify(ty), Vec::new())
    }

    /// Describe a method signature; `has_default` records whether a body
    /// was supplied.
    pub fn method(&self, sig: &Signature, has_default: bool) -> MethodDescriptor {
        let mut generics = self.generics.clone();
        generics.extend(type_params(&sig.generics));
        let scoped = TypeResolver::new(self.index, self.module, generics);

        let receiver = sig.receiver().map(|receiver| match &*receiver.ty {
            Type::Reference(r) if r.mutability.is_some() => Receiver::RefMut,
            Type::Reference(_) => Receiver::Ref,
            _ => Receiver::Value,
        });

        let params = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(typed) => Some(typed),
                FnArg::Receiver(_) => None,
            })
            .enumerate()
            .map(|(index, typed)| {
                let name = match &*typed.pat {
                    Pat::Ident(pat) => pat.ident.to_string(),
                    _ => format!("arg{}", index),
                };
                ParamDescriptor::new(name, scoped.classify(&typed.ty), spelling(&typed.ty))
            })
            .collect();

        let (returns, errors, return_rust) = match &sig.output {
            ReturnType::Default => (TypeDescriptor::Void, Vec::new(), None),
            ReturnType::Type(_, ty) => {
                let (returns, errors) = scoped.classify_return(ty);
                (returns, errors, Some(spelling(ty)))
            }
        };

        let generic_params = if sig.generics.params.is_empty() {
            None
        } else {
            let params = &sig.generics.params;
            Some(quote::quote!(<#params>).to_string())
        };

        MethodDescriptor {
            name: sig.ident.to_string(),
            params,
            returns,
            errors,
            return_rust,
            receiver,
            is_async: sig.asyncness.is_some(),
            generics: generic_params,
            where_clause: sig.generics.where_clause.as_ref().map(spelling),
            has_default,
        }
    }

    /// Resolve a path written in this resolver's module
    pub fn resolve_path(&self, path: &syn::Path) -> QualifiedName {
        self.index.resolve(
            self.module,
            &path_segments(path),
            path.leading_colon.is_some(),
        )
    }
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Token spelling of a syntax node
pub(crate) fn spelling<T: ToTokens>(node: &T) -> String {
    node.to_token_stream().to_string()
}
