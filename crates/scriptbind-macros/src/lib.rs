// scriptbind-macros: the #[script_interface] attribute
//
// The attribute marks a trait as implemented by a script. It generates no
// code itself: `scriptbind-codegen` finds annotated traits when it scans the
// crate's sources at build time. Here the arguments are checked so mistakes
// show up as compile errors on the trait.
//
// Example:
// ```
// use scriptbind_runtime::script_interface;
//
// #[script_interface(context = CalculatorContext, location = "calculator.js")]
// pub trait Calculator {
//     fn add(&self, a: i32, b: i32) -> i32;
// }
// ```

use proc_macro::TokenStream;
use scriptbind_codegen::ScriptInterfaceArgs;
use syn::{parse_macro_input, ItemTrait};

mod interface;

/// Marks a trait as implemented by a script.
///
/// Arguments (all optional):
/// - `context = Path`: type whose public methods the script may call
/// - `location = "file.js"`: static script location; enables the adapter
/// - `excluded = ["name", ...]`: methods left out of every generated surface
/// - `proxy = Ident`: script proxy type (defaults to `<Trait>Proxy`)
///
/// # Example
///
/// ```ignore
/// #[script_interface(location = "greeter.js", excluded = ["debug"])]
/// pub trait Greeter {
///     fn greet(&self, name: &str) -> String;
///     fn debug(&self) -> String {
///         String::new()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn script_interface(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ScriptInterfaceArgs);
    let input = parse_macro_input!(item as ItemTrait);
    interface::expand_script_interface(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
