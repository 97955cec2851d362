//! `#[script_interface(...)]` arguments
//!
//! Shared by the attribute macro (which only validates) and the extractor
//! (which turns annotated traits into interface configurations).

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{bracketed, Attribute, Ident, LitStr, Meta, Path, Token};

/// Parsed `#[script_interface(context = .., location = "..", excluded = [..], proxy = ..)]`
#[derive(Debug, Clone, Default)]
pub struct ScriptInterfaceArgs {
    /// Context type path, as written
    pub context: Option<Path>,
    /// Static script location
    pub location: Option<String>,
    /// Excluded method names
    pub excluded: Vec<String>,
    /// Script proxy type
    pub proxy: Option<Ident>,
}

impl ScriptInterfaceArgs {
    /// Read the arguments of a `#[script_interface]` attribute; the bare
    /// form has none.
    pub fn from_attribute(attr: &Attribute) -> syn::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::List(list) => list.parse_args(),
            Meta::NameValue(nv) => Err(syn::Error::new_spanned(
                nv,
                "expected #[script_interface] or #[script_interface(...)]",
            )),
        }
    }
}

/// Whether the attribute is `#[script_interface]`, bare or path-qualified
pub fn is_script_interface(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .map_or(false, |segment| segment.ident == "script_interface")
}

fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate script_interface argument `{}`", key),
        ));
    }
    *slot = Some(value);
    Ok(())
}

impl Parse for ScriptInterfaceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ScriptInterfaceArgs::default();
        let mut excluded_seen = false;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match key.to_string().as_str() {
                "context" => set_once(&mut args.context, input.parse::<Path>()?, &key)?,
                "location" => {
                    let lit: LitStr = input.parse()?;
                    if lit.value().trim().is_empty() {
                        return Err(syn::Error::new(lit.span(), "script location cannot be empty"));
                    }
                    set_once(&mut args.location, lit.value(), &key)?;
                }
                "excluded" => {
                    if excluded_seen {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate script_interface argument `excluded`",
                        ));
                    }
                    excluded_seen = true;

                    let content;
                    bracketed!(content in input);
                    let names = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                    for name in names {
                        if name.value().trim().is_empty() {
                            return Err(syn::Error::new(name.span(), "excluded name cannot be empty"));
                        }
                        args.excluded.push(name.value());
                    }
                }
                "proxy" => set_once(&mut args.proxy, input.parse::<Ident>()?, &key)?,
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!(
                            "unknown script_interface argument `{}` (expected context, location, excluded or proxy)",
                            other
                        ),
                    ))
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}
