//! Bean properties from accessor methods

use scriptbind_types::{is_identity_method, BeanDescriptor, PrimitiveKind, Receiver, TypeDescriptor};
use syn::{ImplItemFn, ReturnType, Visibility};

use super::index::SourceIndex;
use super::resolve::TypeResolver;
use crate::beans::BeanCatalog;

/// Property named by an accessor, and whether it used the `is` prefix.
///
/// `get_first_name` → `first_name`, `getFirstName` → `firstName`,
/// `is_active` / `isActive` → `active`. An all-caps run keeps its case
/// (`getURL` → `URL`).
pub fn property_name(method: &str) -> Option<(String, bool)> {
    for (prefix, is_flag) in [("get_", false), ("is_", true)] {
        if let Some(rest) = method.strip_prefix(prefix) {
            return (!rest.is_empty()).then(|| (rest.to_string(), is_flag));
        }
    }
    for (prefix, is_flag) in [("get", false), ("is", true)] {
        if let Some(rest) = method.strip_prefix(prefix) {
            if rest.chars().next().map_or(false, char::is_uppercase) {
                return Some((decapitalize(rest), is_flag));
            }
        }
    }
    None
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first.to_lowercase().chain(name[first.len_utf8()..].chars()).collect(),
        (None, _) => String::new(),
    }
}

fn is_boolean(ty: &TypeDescriptor) -> bool {
    matches!(ty, TypeDescriptor::Primitive(PrimitiveKind::Bool) | TypeDescriptor::Boolean)
}

/// Build a bean descriptor for every struct and enum in the index
pub fn bean_catalog(index: &SourceIndex) -> BeanCatalog {
    index
        .types()
        .iter()
        .map(|entry| {
            let mut bean = BeanDescriptor::new(entry.name.clone());
            for block in index.impls_of(&entry.name) {
                let resolver = TypeResolver::new(index, block.module, block.generics.clone());
                for method in &block.methods {
                    if !block.trait_impl && !matches!(method.vis, Visibility::Public(_)) {
                        continue;
                    }
                    if let Some((name, ty)) = accessor_property(&resolver, method) {
                        bean.push_property(name, ty);
                    }
                }
            }
            tracing::debug!(bean = %bean.name, properties = bean.properties.len(), "indexed bean");
            bean
        })
        .collect()
}

fn accessor_property(resolver: &TypeResolver<'_>, method: &ImplItemFn) -> Option<(String, TypeDescriptor)> {
    let sig = &method.sig;
    let name = sig.ident.to_string();
    if is_identity_method(&name) || sig.asyncness.is_some() || sig.inputs.len() != 1 {
        return None;
    }

    let descriptor = resolver.method(sig, true);
    if descriptor.receiver != Some(Receiver::Ref) {
        return None;
    }
    if matches!(sig.output, ReturnType::Default) {
        return None;
    }

    let (property, is_flag) = property_name(&name)?;
    if is_flag && !is_boolean(&descriptor.returns) {
        return None;
    }
    Some((property, descriptor.returns))
}
