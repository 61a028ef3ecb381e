//! Primitive normalization
//!
//! Text, numeric and boolean primitives are boxed so member access goes
//! through the same object path as every other target. Everything else is
//! returned as the same reference.

use chainable_object::{ObjectRef, Value};

/// Produce the object-shaped surrogate for `value`
pub fn normalize(value: &Value) -> Value {
    match ObjectRef::boxed(value) {
        Some(boxed) => Value::Object(boxed),
        None => value.clone(),
    }
}
