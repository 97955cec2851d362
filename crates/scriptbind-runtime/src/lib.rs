//! Scriptbind runtime - support code referenced by generated factories and adapters
//!
//! Generated sources only ever name items from this crate by absolute path
//! (`::scriptbind_runtime::...`), so an application needs nothing but this
//! dependency and the build-time generator.
//!
//! # Example
//!
//! ```ignore
//! use scriptbind_runtime::{script_interface, ScriptInterfaceFactory};
//!
//! #[script_interface(location = "calculator.js")]
//! pub trait Calculator {
//!     fn add(&self, a: i32, b: i32) -> i32;
//! }
//!
//! scriptbind_runtime::include_generated!("calculator_factory.rs");
//! scriptbind_runtime::include_generated!("calculator_adapter.rs");
//!
//! let calculator = CalculatorFactory.create(script_text, ());
//! ```

#![warn(missing_docs)]

mod error;
mod factory;
mod loader;

pub use error::ScriptError;
pub use factory::ScriptInterfaceFactory;
pub use loader::{load_script_library, search_path, SEARCH_PATH_VAR};
pub use scriptbind_macros::script_interface;

/// Includes a file written by the generator into `OUT_DIR`.
///
/// ```ignore
/// scriptbind_runtime::include_generated!("greeter_factory.rs");
/// ```
#[macro_export]
macro_rules! include_generated {
    ($file:literal) => {
        include!(concat!(env!("OUT_DIR"), "/", $file));
    };
}
