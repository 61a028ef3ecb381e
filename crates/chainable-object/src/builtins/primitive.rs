//! Boxed primitive classes: `String`, `Number`, `Boolean`
//!
//! Methods accept either the primitive itself or its boxed form as receiver.
//! String positions count Unicode scalar values.

use std::rc::Rc;

use crate::builtins::{arg, incompatible_receiver, integer_arg, relative_index};
use crate::class::{ClassBuilder, ClassRef};
use crate::object::{ObjectKind, MAX_STRING_LENGTH};
use crate::value::{format_number, Value};
use crate::{ObjectError, ObjectResult};

pub(super) fn string_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("String")
        .extends(object)
        .method("charAt", char_at)
        .method("indexOf", index_of)
        .method("includes", includes)
        .method("startsWith", starts_with)
        .method("endsWith", ends_with)
        .method("slice", slice)
        .method("split", split)
        .method("concat", concat)
        .method("repeat", repeat)
        .method("trim", trim)
        .method("toUpperCase", to_upper_case)
        .method("toLowerCase", to_lower_case)
        .method("toString", string_value_of)
        .method("valueOf", string_value_of)
        .build()
}

pub(super) fn number_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Number")
        .extends(object)
        .method("toFixed", to_fixed)
        .method("toString", number_to_string)
        .method("valueOf", number_value_of)
        .build()
}

pub(super) fn boolean_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Boolean")
        .extends(object)
        .method("toString", boolean_to_string)
        .method("valueOf", boolean_value_of)
        .build()
}

/// Unbox the receiver, accepting the primitive or its boxed form
fn primitive_of(this: &Value) -> Value {
    if let Value::Object(obj) = this {
        if let ObjectKind::Boxed(inner) = obj.borrow().kind() {
            return inner.clone();
        }
    }
    this.clone()
}

fn this_string(this: &Value, method: &str) -> ObjectResult<Rc<str>> {
    match primitive_of(this) {
        Value::String(s) => Ok(s),
        _ => Err(incompatible_receiver("String", method)),
    }
}

fn this_number(this: &Value, method: &str) -> ObjectResult<f64> {
    match primitive_of(this) {
        Value::Number(n) => Ok(n),
        _ => Err(incompatible_receiver("Number", method)),
    }
}

fn this_boolean(this: &Value, method: &str) -> ObjectResult<bool> {
    match primitive_of(this) {
        Value::Bool(b) => Ok(b),
        _ => Err(incompatible_receiver("Boolean", method)),
    }
}

fn string_arg(args: &[Value], index: usize) -> String {
    arg(args, index).to_display_string()
}

fn char_index_of(s: &str, byte_index: usize) -> usize {
    s[..byte_index].chars().count()
}

// ============================================================================
// String
// ============================================================================

fn char_at(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "charAt")?;
    let index = integer_arg(args, 0, 0);
    let c = usize::try_from(index).ok().and_then(|i| s.chars().nth(i));
    Ok(Value::from(c.map(String::from).unwrap_or_default()))
}

fn index_of(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "indexOf")?;
    let needle = string_arg(args, 0);
    let index = s.find(needle.as_str()).map_or(-1, |b| char_index_of(&s, b) as i64);
    Ok(Value::from(index))
}

fn includes(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "includes")?;
    Ok(Value::Bool(s.contains(string_arg(args, 0).as_str())))
}

fn starts_with(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "startsWith")?;
    Ok(Value::Bool(s.starts_with(string_arg(args, 0).as_str())))
}

fn ends_with(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "endsWith")?;
    Ok(Value::Bool(s.ends_with(string_arg(args, 0).as_str())))
}

fn slice(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "slice")?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    let start = relative_index(integer_arg(args, 0, 0), len);
    let end = relative_index(integer_arg(args, 1, len as i64), len);
    let sliced: String = if start < end { chars[start..end].iter().collect() } else { String::new() };
    Ok(Value::from(sliced))
}

fn split(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "split")?;
    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::String(s)],
        separator => {
            let separator = separator.to_display_string();
            if separator.is_empty() {
                s.chars().map(|c| Value::from(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).map(Value::from).collect()
            }
        }
    };
    Ok(Value::array(parts))
}

fn concat(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let mut s = this_string(this, "concat")?.to_string();
    for item in args {
        s.push_str(&item.to_display_string());
    }
    Ok(Value::from(s))
}

fn repeat(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let s = this_string(this, "repeat")?;
    let count = integer_arg(args, 0, 0);
    let count = usize::try_from(count)
        .map_err(|_| ObjectError::RangeError(format!("Invalid count value: {}", count)))?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STRING_LENGTH => Ok(Value::from(s.repeat(count))),
        _ => Err(ObjectError::RangeError("Invalid string length".to_string())),
    }
}

fn trim(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::from(this_string(this, "trim")?.trim()))
}

fn to_upper_case(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::from(this_string(this, "toUpperCase")?.to_uppercase()))
}

fn to_lower_case(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::from(this_string(this, "toLowerCase")?.to_lowercase()))
}

fn string_value_of(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::String(this_string(this, "valueOf")?))
}

// ============================================================================
// Number
// ============================================================================

fn to_fixed(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let n = this_number(this, "toFixed")?;
    let digits = integer_arg(args, 0, 0);
    if !(0..=100).contains(&digits) {
        return Err(ObjectError::RangeError(
            "toFixed() digits argument must be between 0 and 100".to_string(),
        ));
    }
    if !n.is_finite() {
        return Ok(Value::from(format_number(n)));
    }
    Ok(Value::from(format!("{:.*}", digits as usize, n)))
}

fn number_to_string(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::from(format_number(this_number(this, "toString")?)))
}

fn number_value_of(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::Number(this_number(this, "valueOf")?))
}

// ============================================================================
// Boolean
// ============================================================================

fn boolean_to_string(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::from(this_boolean(this, "toString")?.to_string()))
}

fn boolean_value_of(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::Bool(this_boolean(this, "valueOf")?))
}
