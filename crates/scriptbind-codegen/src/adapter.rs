//! Factory and adapter synthesis
//!
//! Both artifacts are built as `quote!` token trees, re-parsed with
//! `syn::parse_file` and formatted with `prettyplease` before they leave this
//! module. Host spellings recorded
//! by the extractor (parameter types, return types, generics) are parsed
//! back into syntax nodes so they are carried through unchanged.
//!
//! The generated files are meant to be `include!`d into the module that
//! declares the trait, so the trait and the script proxy are referred to by
//! their simple names.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use scriptbind_types::{InterfaceDescriptor, MethodDescriptor, Receiver};

use crate::error::GenerateError;

/// Source of the factory (always generated)
pub fn synthesize_factory(
    interface: &InterfaceDescriptor,
    crate_name: &str,
) -> Result<String, GenerateError> {
    let trait_ident = ident(interface, "interface name", interface.simple_name())?;
    let factory_ident = format_ident!("{}Factory", trait_ident);
    let proxy = ident(interface, "proxy type", &interface.proxy)?;
    let context = context_type(interface, crate_name)?;

    let (context_ty, context_param, construct) = match &context {
        Some(ctx) => (
            quote!(::std::sync::Arc<#ctx>),
            quote!(context),
            quote!(#proxy::new(script_library, context)),
        ),
        None => (quote!(()), quote!(_context), quote!(#proxy::new(script_library))),
    };

    let doc = format!(
        " Creates script-backed [`{}`] instances from script source text.",
        interface.simple_name()
    );

    let tokens = quote! {
        #[doc = #doc]
        #[derive(Debug, Default, Clone, Copy)]
        pub struct #factory_ident;

        impl ::scriptbind_runtime::ScriptInterfaceFactory for #factory_ident {
            type Interface = dyn #trait_ident;
            type Context = #context_ty;

            fn create(
                &self,
                script_library: ::std::string::String,
                #context_param: Self::Context,
            ) -> ::std::boxed::Box<dyn #trait_ident> {
                ::std::boxed::Box::new(#construct)
            }
        }
    };

    render(interface, &format!("{}Factory", interface.simple_name()), tokens)
}

/// Source of the adapter, or `None` without a static script location
pub fn synthesize_adapter(
    interface: &InterfaceDescriptor,
    crate_name: &str,
) -> Result<Option<String>, GenerateError> {
    let Some(location) = &interface.script_location else {
        return Ok(None);
    };

    let trait_ident = ident(interface, "interface name", interface.simple_name())?;
    let adapter_ident = format_ident!("{}Adapter", trait_ident);
    let proxy = ident(interface, "proxy type", &interface.proxy)?;
    let context = context_type(interface, crate_name)?;

    let load = quote! {
        let script_library =
            ::scriptbind_runtime::load_script_library(Self::SCRIPT_LIBRARY_LOCATION)
                .unwrap_or_else(|err| panic!("{}", err));
    };

    let doc = format!(
        " [`{}`] backed by the script at `{}`; every call runs on a fresh delegate.",
        interface.simple_name(),
        location
    );

    let definition = match &context {
        Some(ctx) => quote! {
            #[doc = #doc]
            pub struct #adapter_ident {
                context: ::std::sync::Arc<#ctx>,
            }

            impl #adapter_ident {
                pub const SCRIPT_LIBRARY_LOCATION: &'static str = #location;

                pub fn new(context: ::std::sync::Arc<#ctx>) -> Self {
                    Self { context }
                }

                fn create_delegate(&self) -> #proxy {
                    #load
                    #proxy::new(script_library, ::std::sync::Arc::clone(&self.context))
                }
            }
        },
        None => quote! {
            #[doc = #doc]
            #[derive(Debug, Default, Clone, Copy)]
            pub struct #adapter_ident;

            impl #adapter_ident {
                pub const SCRIPT_LIBRARY_LOCATION: &'static str = #location;

                pub fn new() -> Self {
                    Self
                }

                fn create_delegate(&self) -> #proxy {
                    #load
                    #proxy::new(script_library)
                }
            }
        },
    };

    let methods = interface
        .exposed_methods()
        .map(|method| forward_method(interface, method))
        .collect::<Result<Vec<_>, _>>()?;

    let tokens = quote! {
        #definition

        impl #trait_ident for #adapter_ident {
            #(#methods)*
        }
    };

    render(interface, &format!("{}Adapter", interface.simple_name()), tokens).map(Some)
}

/// One forwarded method: acquire a delegate, call it, release it, return.
fn forward_method(
    interface: &InterfaceDescriptor,
    method: &MethodDescriptor,
) -> Result<TokenStream, GenerateError> {
    let receiver = match method.receiver {
        Some(Receiver::Value) => quote!(self),
        Some(Receiver::Ref) => quote!(&self),
        Some(Receiver::RefMut) => quote!(&mut self),
        None => {
            return Err(GenerateError::MissingReceiver {
                interface: interface.name.to_string(),
                method: method.name.clone(),
            })
        }
    };

    let name = ident(interface, "method name", &method.name)?;
    let mut params = Vec::with_capacity(method.params.len());
    let mut args = Vec::with_capacity(method.params.len());
    for param in &method.params {
        let arg = ident(interface, "parameter name", &param.name)?;
        let ty: syn::Type = parse(interface, "parameter type", &param.rust_type)?;
        params.push(quote!(#arg: #ty));
        args.push(arg);
    }

    let output = match &method.return_rust {
        Some(spelling) => {
            let ty: syn::Type = parse(interface, "return type", spelling)?;
            quote!(-> #ty)
        }
        None => quote!(),
    };

    let generics = match &method.generics {
        Some(spelling) => {
            let generics: syn::Generics = parse(interface, "generic parameters", spelling)?;
            quote!(#generics)
        }
        None => quote!(),
    };

    let where_clause = match &method.where_clause {
        Some(spelling) => {
            let clause: syn::WhereClause = parse(interface, "where clause", spelling)?;
            quote!(#clause)
        }
        None => quote!(),
    };

    // Locals of the forwarding body must not shadow parameter names.
    let delegate = format_ident!("__scriptbind_delegate");
    let result = format_ident!("__scriptbind_result");

    let (asyncness, call) = if method.is_async {
        (quote!(async), quote!(#delegate.#name(#(#args),*).await))
    } else {
        (quote!(), quote!(#delegate.#name(#(#args),*)))
    };

    // A by-value call consumes the delegate, which releases it.
    let (binding, release) = match method.receiver {
        Some(Receiver::RefMut) => (quote!(let mut #delegate), quote!(drop(#delegate);)),
        Some(Receiver::Value) => (quote!(let #delegate), quote!()),
        _ => (quote!(let #delegate), quote!(drop(#delegate);)),
    };

    Ok(quote! {
        #asyncness fn #name #generics (#receiver, #(#params),*) #output #where_clause {
            #binding = self.create_delegate();
            let #result = #call;
            #release
            #result
        }
    })
}

fn context_type(
    interface: &InterfaceDescriptor,
    crate_name: &str,
) -> Result<Option<syn::Path>, GenerateError> {
    interface
        .context
        .as_ref()
        .map(|ctx| parse(interface, "context type", &ctx.name.to_rust_path(crate_name)))
        .transpose()
}

fn ident(
    interface: &InterfaceDescriptor,
    what: &'static str,
    spelling: &str,
) -> Result<syn::Ident, GenerateError> {
    parse(interface, what, spelling)
}

fn parse<T: syn::parse::Parse>(
    interface: &InterfaceDescriptor,
    what: &'static str,
    spelling: &str,
) -> Result<T, GenerateError> {
    syn::parse_str(spelling).map_err(|e| GenerateError::InvalidSpelling {
        interface: interface.name.to_string(),
        what,
        spelling: spelling.to_string(),
        message: e.to_string(),
    })
}

fn render(
    interface: &InterfaceDescriptor,
    item: &str,
    tokens: TokenStream,
) -> Result<String, GenerateError> {
    let file = syn::parse_file(&tokens.to_string()).map_err(|e| GenerateError::InvalidOutput {
        target: item.to_string(),
        message: e.to_string(),
    })?;

    Ok(format!(
        "// @generated by scriptbind from {}. Do not edit.\n\n{}",
        interface.name,
        prettyplease::unparse(&file)
    ))
}
