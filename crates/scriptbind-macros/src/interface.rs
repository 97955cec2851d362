// #[script_interface] implementation
//
// Validates the arguments against the trait and re-emits the trait as is.

use proc_macro2::TokenStream;
use quote::quote;
use scriptbind_codegen::ScriptInterfaceArgs;
use syn::{ItemTrait, Result, TraitItem, TraitItemFn};

/// Expands the #[script_interface] attribute macro.
///
/// Checks that every excluded name is a method of the trait and, when a
/// script location is given, that every forwarded method takes `self` in
/// some form (the adapter cannot forward associated functions).
pub fn expand_script_interface(args: ScriptInterfaceArgs, item: ItemTrait) -> Result<TokenStream> {
    let methods: Vec<&TraitItemFn> = item
        .items
        .iter()
        .filter_map(|item| match item {
            TraitItem::Fn(method) => Some(method),
            _ => None,
        })
        .collect();

    for excluded in &args.excluded {
        if !methods.iter().any(|m| m.sig.ident == excluded) {
            return Err(syn::Error::new_spanned(
                &item.ident,
                format!("excluded method `{}` is not declared by `{}`", excluded, item.ident),
            ));
        }
    }

    if args.location.is_some() {
        for method in &methods {
            let name = method.sig.ident.to_string();
            if args.excluded.contains(&name) || scriptbind_types::is_identity_method(&name) {
                continue;
            }
            if method.sig.receiver().is_none() {
                return Err(syn::Error::new_spanned(
                    &method.sig,
                    "methods of a script interface with a location must take `self`, `&self` or `&mut self`",
                ));
            }
        }
    }

    Ok(quote!(#item))
}
