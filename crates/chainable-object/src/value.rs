//! Value representation
//!
//! `Value` is the tagged union every member access consumes and produces.
//! Primitives are stored inline; objects and functions are shared references,
//! so cloning a `Value` never copies the underlying object.
//!
//! # Equality
//!
//! `PartialEq` is structural: arrays compare element-wise, maps and sets
//! entry-wise, ordinary objects property-wise. Use [`Value::is_same`] for
//! identity. A pair of objects reached again while already being compared is
//! taken as equal, so cyclic graphs compare without looping.

use std::fmt;
use std::rc::Rc;

use crate::builtins::builtins;
use crate::class::ClassRef;
use crate::function::Function;
use crate::object::{string_own_member, string_own_member_names, ObjectKind, ObjectRef};

/// Nesting depth after which `Display`/`Debug` print `[ClassName]`
const MAX_INSPECT_DEPTH: usize = 3;

/// Dynamically typed value
#[derive(Clone, Default)]
pub enum Value {
    /// The "no value" marker (unset members, out-of-range lookups)
    #[default]
    Undefined,
    /// Explicit null
    Null,
    /// Boolean primitive
    Bool(bool),
    /// Numeric primitive (IEEE 754 double)
    Number(f64),
    /// Text primitive
    String(Rc<str>),
    /// Shared heap object
    Object(ObjectRef),
    /// Shared callable
    Function(Function),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    /// Create a new array holding `items`
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Object(ObjectRef::array(items.into_iter().map(Into::into).collect()))
    }

    /// Create a new ordinary object with no properties
    pub fn object() -> Self {
        Value::Object(ObjectRef::ordinary())
    }

    /// Create a new empty map
    pub fn map() -> Self {
        Value::Object(ObjectRef::map())
    }

    /// Create a new map holding `entries` in iteration order
    pub fn map_from<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Object(ObjectRef::map_from(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())),
        ))
    }

    /// Create a new set holding `values` (duplicates collapse)
    pub fn set_from<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Object(ObjectRef::set_from(values.into_iter().map(Into::into)))
    }

    /// Create a new empty weak map
    pub fn weak_map() -> Self {
        Value::Object(ObjectRef::weak_map())
    }

    /// Check if this value is the "no value" marker
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is null or undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if this value is a text, numeric or boolean primitive
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract numeric value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string contents
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract object reference
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Extract function
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Short type name used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Class whose members this value inherits
    ///
    /// Primitives report the class of their boxed counterpart. Null and
    /// undefined have no class.
    pub fn class(&self) -> Option<ClassRef> {
        let b = builtins();
        match self {
            Value::Undefined | Value::Null => None,
            Value::Bool(_) => Some(b.boolean.clone()),
            Value::Number(_) => Some(b.number.clone()),
            Value::String(_) => Some(b.string.clone()),
            Value::Function(_) => Some(b.function.clone()),
            Value::Object(obj) => Some(obj.class()),
        }
    }

    /// Check whether `name` is declared directly on this value (not inherited)
    pub fn has_own_member(&self, name: &str) -> bool {
        match self {
            Value::String(s) => string_own_member(s, name).is_some(),
            Value::Object(obj) => obj.has_own(name),
            _ => false,
        }
    }

    /// Names declared directly on this value
    pub fn own_member_names(&self) -> Vec<String> {
        match self {
            Value::String(s) => string_own_member_names(s),
            Value::Object(obj) => obj.own_member_names(),
            _ => Vec::new(),
        }
    }

    /// Identity comparison (same-value-zero)
    ///
    /// Objects and functions compare by reference; primitives by value, with
    /// `NaN` equal to itself and `-0` equal to `0`.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Strict equality (`NaN` is never equal to itself)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self.is_same(other),
        }
    }

    /// Truthiness used by predicate callbacks
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// String conversion used by `join`, `concat` and friends
    ///
    /// An array reached again while it is being converted renders as an
    /// empty string.
    pub fn to_display_string(&self) -> String {
        self.display_within(&mut Vec::new())
    }

    /// String conversion tracking the addresses of arrays being converted
    pub(crate) fn display_within(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Function(f) => format!("function {}() {{ [native code] }}", f.name()),
            Value::Object(obj) => {
                let Ok(object) = obj.try_borrow() else {
                    return "[object Object]".to_string();
                };
                match object.kind() {
                    ObjectKind::Array(elements) => {
                        if seen.contains(&obj.addr()) {
                            return String::new();
                        }
                        seen.push(obj.addr());
                        let joined = join_elements(elements, ",", seen);
                        seen.pop();
                        joined
                    }
                    ObjectKind::Boxed(inner) => inner.display_within(seen),
                    _ => format!("[object {}]", object.class().name()),
                }
            }
        }
    }

    /// Structural equality tracking the object pairs being compared
    pub(crate) fn structural_eq(&self, other: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b) || a.deep_eq(b, seen),
            _ => self.is_same(other),
        }
    }

    fn inspect(&self, f: &mut fmt::Formatter<'_>, depth: usize, quote: bool) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) if quote => write!(f, "{:?}", s),
            Value::String(s) => f.write_str(s),
            Value::Function(func) => write!(f, "[Function: {}]", func.name()),
            Value::Object(obj) => inspect_object(obj, f, depth),
        }
    }
}

fn inspect_object(obj: &ObjectRef, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let Ok(object) = obj.try_borrow() else {
        return f.write_str("[Object <borrowed>]");
    };
    let class_name = object.class().name();
    if depth > MAX_INSPECT_DEPTH {
        return write!(f, "[{}]", class_name);
    }

    match object.kind() {
        ObjectKind::Array(elements) => {
            f.write_str("[")?;
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                element.inspect(f, depth + 1, true)?;
            }
            f.write_str("]")
        }
        ObjectKind::Map(entries) => {
            write!(f, "Map({}) {{", entries.len())?;
            for (i, (key, value)) in entries.iter().enumerate() {
                f.write_str(if i > 0 { ", " } else { " " })?;
                key.value().inspect(f, depth + 1, true)?;
                f.write_str(" => ")?;
                value.inspect(f, depth + 1, true)?;
            }
            f.write_str(if entries.is_empty() { "}" } else { " }" })
        }
        ObjectKind::Set(members) => {
            write!(f, "Set({}) {{", members.len())?;
            for (i, member) in members.iter().enumerate() {
                f.write_str(if i > 0 { ", " } else { " " })?;
                member.value().inspect(f, depth + 1, true)?;
            }
            f.write_str(if members.is_empty() { "}" } else { " }" })
        }
        ObjectKind::WeakMap(_) => f.write_str("WeakMap { <items unknown> }"),
        ObjectKind::Boxed(inner) => {
            write!(f, "[{}: ", class_name)?;
            inner.inspect(f, depth + 1, true)?;
            f.write_str("]")
        }
        ObjectKind::Ordinary => {
            if class_name != "Object" {
                write!(f, "{} ", class_name)?;
            }
            if object.properties().is_empty() {
                return f.write_str("{}");
            }
            f.write_str("{ ")?;
            for (i, (name, value)) in object.properties().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", name)?;
                value.inspect(f, depth + 1, true)?;
            }
            f.write_str(" }")
        }
    }
}

/// Format a number the way script output does (`5`, `0.5`, `NaN`, `Infinity`)
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inspect(f, 0, false)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inspect(f, 0, true)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other, &mut Vec::new())
    }
}

/// Join display strings of `elements`; nullish elements render empty
pub(crate) fn join_elements(elements: &[Value], separator: &str, seen: &mut Vec<usize>) -> String {
    elements
        .iter()
        .map(|e| if e.is_nullish() { String::new() } else { e.display_within(seen) })
        .collect::<Vec<_>>()
        .join(separator)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_accessors() {
        assert_eq!(Value::from(5).as_number(), Some(5.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert!(Value::Undefined.is_nullish());
        assert!(Value::Null.is_nullish());
        assert!(!Value::from(0).is_nullish());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Value::array([1, 2, 3]), Value::array([1, 2, 3]));
        assert_ne!(Value::array([1, 2, 3]), Value::array([1, 2]));
        assert_eq!(
            Value::map_from([("a", 1), ("b", 2)]),
            Value::map_from([("b", 2), ("a", 1)])
        );
        assert_eq!(Value::set_from(["x", "y"]), Value::set_from(["y", "x"]));
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_identity_vs_structure() {
        let a = Value::array([1]);
        let b = Value::array([1]);
        assert_eq!(a, b);
        assert!(!a.is_same(&b));
        assert!(a.is_same(&a.clone()));
    }

    #[test]
    fn test_strict_equals_nan() {
        let nan = Value::Number(f64::NAN);
        assert!(nan.is_same(&nan));
        assert!(!nan.strict_equals(&nan));
        assert!(Value::from(0.0).strict_equals(&Value::from(-0.0)));
    }

    #[test]
    fn test_class_of_primitives() {
        assert_eq!(Value::from(1).class().unwrap().name(), "Number");
        assert_eq!(Value::from("a").class().unwrap().name(), "String");
        assert_eq!(Value::from(false).class().unwrap().name(), "Boolean");
        assert!(Value::Null.class().is_none());
    }

    #[test]
    fn test_string_own_members() {
        let s = Value::from("abc");
        assert!(s.has_own_member("length"));
        assert!(s.has_own_member("2"));
        assert!(!s.has_own_member("3"));
        assert!(!s.has_own_member("toUpperCase"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Value::array([Value::from(1), Value::from("a")]).to_string(), "[1, \"a\"]");
        assert_eq!(Value::map_from([("k", 1)]).to_string(), "Map(1) { \"k\" => 1 }");
        assert_eq!(Value::set_from(Vec::<Value>::new()).to_string(), "Set(0) {}");
    }

    #[test]
    fn test_display_string_of_array() {
        let arr = Value::array([Value::from(1), Value::Null, Value::from("x")]);
        assert_eq!(arr.to_display_string(), "1,,x");
    }

    #[test]
    fn test_display_string_of_cyclic_array() {
        let arr = Value::array([1, 2]);
        let obj = arr.as_object().unwrap().clone();
        obj.set_own("2", arr.clone()).unwrap();
        assert_eq!(arr.to_display_string(), "1,2,");

        // The same array twice side by side is not a cycle
        let inner = Value::array([7]);
        let outer = Value::array([inner.clone(), inner]);
        assert_eq!(outer.to_display_string(), "7,7");
    }

    #[test]
    fn test_cyclic_equality_terminates() {
        let a = Value::array([1]);
        a.as_object().unwrap().set_own("1", a.clone()).unwrap();
        let b = Value::array([1]);
        b.as_object().unwrap().set_own("1", b.clone()).unwrap();
        assert_eq!(a, b);

        let c = Value::array([2]);
        c.as_object().unwrap().set_own("1", c.clone()).unwrap();
        assert_ne!(a, c);
    }
}
