//! Chainable object model
//!
//! This crate provides the dynamic object model that chain handles operate on:
//! - Tagged `Value` union (undefined, null, bool, number, string, object, function)
//! - Reference-counted heap objects with own properties
//! - Classes with declared methods/accessors and an explicit parent link
//! - Built-in classes (Object, Array, Map, Set, WeakMap, String, Number, Boolean, Function)
//! - Member protocol: lookup by name, read, write

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builtins;
pub mod class;
pub mod function;
pub mod json;
pub mod member;
pub mod object;
pub mod value;

pub use builtins::{builtins, Builtins};
pub use class::{Accessor, Class, ClassBuilder, ClassRef, Method};
pub use function::Function;
pub use member::{find_member, get_member, set_member, MemberSlot};
pub use object::{MapKey, Object, ObjectKind, ObjectRef};
pub use value::Value;

/// Errors raised by operations on the object model
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectError {
    /// Operation applied to a value of the wrong type
    #[error("Type error: {0}")]
    TypeError(String),

    /// Numeric argument outside the accepted range
    #[error("Range error: {0}")]
    RangeError(String),

    /// Error raised by user code (callbacks, custom class methods)
    #[error("{0}")]
    Thrown(String),
}

impl From<String> for ObjectError {
    fn from(s: String) -> Self {
        ObjectError::Thrown(s)
    }
}

impl From<&str> for ObjectError {
    fn from(s: &str) -> Self {
        ObjectError::Thrown(s.to_string())
    }
}

/// Object model operation result
pub type ObjectResult<T> = Result<T, ObjectError>;
