//! Built-in classes
//!
//! The class table is built once per process and shared. Every built-in
//! class except `Object` has `Object` as its parent.

mod array;
mod keyed;
mod primitive;
mod root;

use once_cell::sync::Lazy;

use crate::class::ClassRef;
use crate::function::Function;
use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Table of built-in classes
#[derive(Debug)]
pub struct Builtins {
    /// Root class
    pub object: ClassRef,
    /// Class of function values
    pub function: ClassRef,
    /// Sequence container
    pub array: ClassRef,
    /// Key-value store
    pub map: ClassRef,
    /// Unique-membership collection
    pub set: ClassRef,
    /// Key-value store with weakly held object keys
    pub weak_map: ClassRef,
    /// Boxed text
    pub string: ClassRef,
    /// Boxed number
    pub number: ClassRef,
    /// Boxed boolean
    pub boolean: ClassRef,
}

static BUILTINS: Lazy<Builtins> = Lazy::new(Builtins::new);

/// Process-wide built-in class table
pub fn builtins() -> &'static Builtins {
    &BUILTINS
}

impl Builtins {
    fn new() -> Self {
        let object = root::object_class();
        Self {
            function: root::function_class(&object),
            array: array::array_class(&object),
            map: keyed::map_class(&object),
            set: keyed::set_class(&object),
            weak_map: keyed::weak_map_class(&object),
            string: primitive::string_class(&object),
            number: primitive::number_class(&object),
            boolean: primitive::boolean_class(&object),
            object,
        }
    }

    /// All built-in classes, root first
    pub fn iter(&self) -> impl Iterator<Item = &ClassRef> {
        [
            &self.object,
            &self.function,
            &self.array,
            &self.map,
            &self.set,
            &self.weak_map,
            &self.string,
            &self.number,
            &self.boolean,
        ]
        .into_iter()
    }

    /// Lookup a built-in class by name
    pub fn class_by_name(&self, name: &str) -> Option<&ClassRef> {
        self.iter().find(|class| class.name() == name)
    }
}

/// Argument at `index`, or `undefined` when missing
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Callback argument at `index`
pub(crate) fn callback(args: &[Value], index: usize, method: &str) -> ObjectResult<Function> {
    match args.get(index) {
        Some(Value::Function(f)) => Ok(f.clone()),
        other => Err(ObjectError::TypeError(format!(
            "{} is not a function (in {})",
            other.cloned().unwrap_or_default(),
            method
        ))),
    }
}

/// Integer argument at `index` (truncated; `NaN` reads as 0, missing as `default`)
pub(crate) fn integer_arg(args: &[Value], index: usize, default: i64) -> i64 {
    match args.get(index) {
        None | Some(Value::Undefined) => default,
        Some(Value::Number(n)) if n.is_nan() => 0,
        Some(Value::Number(n)) => n.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64,
        Some(Value::Bool(b)) => *b as i64,
        Some(_) => 0,
    }
}

/// Resolve a possibly negative relative index against `len`
pub(crate) fn relative_index(relative: i64, len: usize) -> usize {
    if relative < 0 {
        len.saturating_sub(relative.unsigned_abs() as usize)
    } else {
        (relative as usize).min(len)
    }
}

pub(crate) fn incompatible_receiver(class: &str, method: &str) -> ObjectError {
    ObjectError::TypeError(format!(
        "{}.prototype.{} called on incompatible receiver",
        class, method
    ))
}
