//! Member protocol: lookup, read and write by name
//!
//! Lookup order is own members first, then each class on the hierarchy from
//! the value's class up to the root. On every class, methods are checked
//! before accessors.

use crate::class::{Accessor, Method};
use crate::function::Function;
use crate::object::string_own_member;
use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Where a member name resolves to
#[derive(Debug, Clone)]
pub enum MemberSlot {
    /// Own member holding a value
    Own(Value),
    /// Method declared on a class in the hierarchy
    Method(Method),
    /// Accessor declared on a class in the hierarchy
    Accessor(Accessor),
    /// Not found anywhere
    Absent,
}

/// Resolve `name` on `target`
pub fn find_member(target: &Value, name: &str) -> MemberSlot {
    let own = match target {
        Value::String(s) => string_own_member(s, name),
        Value::Object(obj) => obj.get_own(name),
        _ => None,
    };
    if let Some(value) = own {
        return MemberSlot::Own(value);
    }

    let Some(class) = target.class() else {
        return MemberSlot::Absent;
    };
    for link in class.ancestors() {
        if let Some(method) = link.method(name) {
            return MemberSlot::Method(method.clone());
        }
        if let Some(accessor) = link.accessor(name) {
            return MemberSlot::Accessor(accessor.clone());
        }
    }
    MemberSlot::Absent
}

/// Read member `name` of `target`
///
/// Methods read as function values; absent members read as `undefined`.
pub fn get_member(target: &Value, name: &str) -> ObjectResult<Value> {
    if target.is_nullish() {
        return Err(ObjectError::TypeError(format!(
            "Cannot read properties of {} (reading '{}')",
            target, name
        )));
    }
    Ok(match find_member(target, name) {
        MemberSlot::Own(value) => value,
        MemberSlot::Method(method) => Value::Function(Function::from_method(name, &method)),
        MemberSlot::Accessor(accessor) => accessor.get(target)?,
        MemberSlot::Absent => Value::Undefined,
    })
}

/// Write member `name` of `target`
///
/// Own members are updated in place. Otherwise a setter declared in the
/// hierarchy receives the value, a getter-only accessor rejects the write,
/// and anything else creates a new own property.
pub fn set_member(target: &Value, name: &str, value: Value) -> ObjectResult<()> {
    if target.is_nullish() {
        return Err(ObjectError::TypeError(format!(
            "Cannot set properties of {} (setting '{}')",
            target, name
        )));
    }

    if !target.has_own_member(name) {
        if let Some(class) = target.class() {
            let accessor = class.ancestors().find_map(|link| link.accessor(name).cloned());
            if let Some(accessor) = accessor {
                return accessor.set(target, value).unwrap_or_else(|| {
                    Err(ObjectError::TypeError(format!(
                        "Cannot set property {} of {} which has only a getter",
                        name,
                        class.name()
                    )))
                });
            }
        }
    }

    match target {
        Value::Object(obj) => obj.set_own(name, value),
        other => Err(ObjectError::TypeError(format!(
            "Cannot create property '{}' on {} '{}'",
            name,
            other.type_name(),
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassBuilder;
    use crate::object::ObjectRef;

    #[test]
    fn test_own_before_class() {
        let arr = Value::array([1, 2, 3]);
        assert!(matches!(find_member(&arr, "length"), MemberSlot::Own(_)));
        assert!(matches!(find_member(&arr, "push"), MemberSlot::Method(_)));
        assert!(matches!(find_member(&arr, "hasOwnProperty"), MemberSlot::Method(_)));
        assert!(matches!(find_member(&arr, "nope"), MemberSlot::Absent));
    }

    #[test]
    fn test_accessor_lookup() {
        let map = Value::map();
        assert!(matches!(find_member(&map, "size"), MemberSlot::Accessor(_)));
        assert_eq!(get_member(&map, "size").unwrap(), Value::from(0));
    }

    #[test]
    fn test_read_method_as_function() {
        let arr = Value::array([1]);
        let push = get_member(&arr, "push").unwrap();
        let push = push.as_function().unwrap();
        assert_eq!(push.call(&arr, &[Value::from(2)]).unwrap(), Value::from(2));
        assert_eq!(arr, Value::array([1, 2]));
    }

    #[test]
    fn test_nullish_target() {
        assert!(get_member(&Value::Null, "x").is_err());
        assert!(set_member(&Value::Undefined, "x", Value::from(1)).is_err());
    }

    #[test]
    fn test_getter_only_rejects_write() {
        let set = Value::set_from([1]);
        let err = set_member(&set, "size", Value::from(5)).unwrap_err();
        assert_eq!(
            err,
            ObjectError::TypeError("Cannot set property size of Set which has only a getter".to_string())
        );
    }

    #[test]
    fn test_setter_receives_write() {
        let celsius = ClassBuilder::new("Temperature")
            .accessor(
                "fahrenheit",
                |this| {
                    let c = this.as_object().and_then(|o| o.get_own("celsius")).unwrap_or_default();
                    Ok(Value::from(c.as_number().unwrap_or(0.0) * 9.0 / 5.0 + 32.0))
                },
                |this, value| {
                    let f = value.as_number().unwrap_or(32.0);
                    match this.as_object() {
                        Some(obj) => obj.set_own("celsius", (f - 32.0) * 5.0 / 9.0),
                        None => Err(ObjectError::TypeError("not a Temperature".to_string())),
                    }
                },
            )
            .build();
        let t = Value::Object(ObjectRef::instance(&celsius));
        set_member(&t, "fahrenheit", Value::from(212)).unwrap();
        assert_eq!(get_member(&t, "celsius").unwrap(), Value::from(100));
        assert_eq!(get_member(&t, "fahrenheit").unwrap(), Value::from(212));
    }

    #[test]
    fn test_write_creates_own_property() {
        let obj = Value::object();
        set_member(&obj, "answer", Value::from(42)).unwrap();
        assert!(obj.has_own_member("answer"));
        assert_eq!(get_member(&obj, "answer").unwrap(), Value::from(42));
    }

    #[test]
    fn test_write_on_primitive_fails() {
        assert!(set_member(&Value::from(5), "x", Value::from(1)).is_err());
    }
}
