//! Method exclusion policy shared by every generated surface

/// Methods every Rust type structurally carries through the standard
/// traits (equality, hashing, string conversion, runtime type). They carry
/// no meaning in a script contract and never appear in generated output.
pub const IDENTITY_METHODS: &[&str] = &["eq", "ne", "hash", "fmt", "to_string", "type_id"];

/// Whether `name` is one of [`IDENTITY_METHODS`]
pub fn is_identity_method(name: &str) -> bool {
    IDENTITY_METHODS.contains(&name)
}
