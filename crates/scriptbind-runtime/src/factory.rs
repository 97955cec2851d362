//! Factory trait implemented by every generated `<Interface>Factory`

/// Builds script-backed implementations of one interface.
///
/// `Interface` is the trait object type (`dyn Calculator`); `Context` is
/// `Arc<C>` for interfaces with a context type and `()` otherwise.
pub trait ScriptInterfaceFactory {
    /// Trait object produced by [`create`](Self::create)
    type Interface: ?Sized;

    /// Host object exposed to the script
    type Context;

    /// Wraps the script text (and context) in a proxy implementing the interface
    fn create(&self, script_library: String, context: Self::Context) -> Box<Self::Interface>;
}
