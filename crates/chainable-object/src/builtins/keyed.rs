//! Keyed collections: `Map`, `Set` and `WeakMap`
//!
//! `keys`, `values` and `entries` return arrays in insertion order.

use crate::builtins::{arg, callback, incompatible_receiver};
use crate::class::{ClassBuilder, ClassRef};
use crate::object::{MapEntries, MapKey, ObjectKind, SetMembers, WeakEntries, WeakEntry};
use crate::value::Value;
use crate::{ObjectError, ObjectResult};

pub(super) fn map_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Map")
        .extends(object)
        .method("get", map_get)
        .method("set", map_set)
        .method("has", map_has)
        .method("delete", map_delete)
        .method("clear", map_clear)
        .method("keys", map_keys)
        .method("values", map_values)
        .method("entries", map_entries)
        .method("forEach", map_for_each)
        .getter("size", map_size)
        .build()
}

pub(super) fn set_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Set")
        .extends(object)
        .method("add", set_add)
        .method("has", set_has)
        .method("delete", set_delete)
        .method("clear", set_clear)
        .method("values", set_values)
        .method("keys", set_values)
        .method("entries", set_entries)
        .method("forEach", set_for_each)
        .getter("size", set_size)
        .build()
}

pub(super) fn weak_map_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("WeakMap")
        .extends(object)
        .method("get", weak_get)
        .method("set", weak_set)
        .method("has", weak_has)
        .method("delete", weak_delete)
        .build()
}

// ============================================================================
// Map
// ============================================================================

fn with_map<R>(this: &Value, method: &str, f: impl FnOnce(&mut MapEntries) -> R) -> ObjectResult<R> {
    let Value::Object(obj) = this else {
        return Err(incompatible_receiver("Map", method));
    };
    let mut object = obj.borrow_mut();
    match object.kind_mut() {
        ObjectKind::Map(entries) => Ok(f(entries)),
        _ => Err(incompatible_receiver("Map", method)),
    }
}

fn map_get(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = MapKey::new(arg(args, 0));
    with_map(this, "get", |entries| entries.get(&key).cloned().unwrap_or_default())
}

fn map_set(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = MapKey::new(arg(args, 0));
    let value = arg(args, 1);
    with_map(this, "set", |entries| {
        entries.insert(key, value);
    })?;
    Ok(this.clone())
}

fn map_has(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = MapKey::new(arg(args, 0));
    with_map(this, "has", |entries| Value::Bool(entries.contains_key(&key)))
}

fn map_delete(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = MapKey::new(arg(args, 0));
    with_map(this, "delete", |entries| {
        Value::Bool(entries.shift_remove(&key).is_some())
    })
}

fn map_clear(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    with_map(this, "clear", |entries| entries.clear())?;
    Ok(Value::Undefined)
}

fn map_keys(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    let keys = with_map(this, "keys", |entries| {
        entries.keys().map(|k| k.value().clone()).collect::<Vec<_>>()
    })?;
    Ok(Value::array(keys))
}

fn map_values(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    let values = with_map(this, "values", |entries| entries.values().cloned().collect::<Vec<_>>())?;
    Ok(Value::array(values))
}

fn map_pairs(this: &Value, method: &str) -> ObjectResult<Vec<(Value, Value)>> {
    with_map(this, method, |entries| {
        entries
            .iter()
            .map(|(k, v)| (k.value().clone(), v.clone()))
            .collect()
    })
}

fn map_entries(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    let pairs = map_pairs(this, "entries")?;
    Ok(Value::array(pairs.into_iter().map(|(k, v)| Value::array([k, v]))))
}

fn map_for_each(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let cb = callback(args, 0, "Map.prototype.forEach")?;
    for (key, value) in map_pairs(this, "forEach")? {
        cb.call(&Value::Undefined, &[value, key, this.clone()])?;
    }
    Ok(Value::Undefined)
}

fn map_size(this: &Value) -> ObjectResult<Value> {
    with_map(this, "size", |entries| Value::from(entries.len()))
}

// ============================================================================
// Set
// ============================================================================

fn with_set<R>(this: &Value, method: &str, f: impl FnOnce(&mut SetMembers) -> R) -> ObjectResult<R> {
    let Value::Object(obj) = this else {
        return Err(incompatible_receiver("Set", method));
    };
    let mut object = obj.borrow_mut();
    match object.kind_mut() {
        ObjectKind::Set(members) => Ok(f(members)),
        _ => Err(incompatible_receiver("Set", method)),
    }
}

fn set_members(this: &Value, method: &str) -> ObjectResult<Vec<Value>> {
    with_set(this, method, |members| members.iter().map(|m| m.value().clone()).collect())
}

fn set_add(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let member = MapKey::new(arg(args, 0));
    with_set(this, "add", |members| {
        members.insert(member);
    })?;
    Ok(this.clone())
}

fn set_has(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let member = MapKey::new(arg(args, 0));
    with_set(this, "has", |members| Value::Bool(members.contains(&member)))
}

fn set_delete(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let member = MapKey::new(arg(args, 0));
    with_set(this, "delete", |members| Value::Bool(members.shift_remove(&member)))
}

fn set_clear(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    with_set(this, "clear", |members| members.clear())?;
    Ok(Value::Undefined)
}

fn set_values(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::array(set_members(this, "values")?))
}

fn set_entries(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    let members = set_members(this, "entries")?;
    Ok(Value::array(members.into_iter().map(|m| Value::array([m.clone(), m]))))
}

fn set_for_each(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let cb = callback(args, 0, "Set.prototype.forEach")?;
    for member in set_members(this, "forEach")? {
        cb.call(&Value::Undefined, &[member.clone(), member, this.clone()])?;
    }
    Ok(Value::Undefined)
}

fn set_size(this: &Value) -> ObjectResult<Value> {
    with_set(this, "size", |members| Value::from(members.len()))
}

// ============================================================================
// WeakMap
// ============================================================================

fn with_weak_map<R>(this: &Value, method: &str, f: impl FnOnce(&mut WeakEntries) -> R) -> ObjectResult<R> {
    let Value::Object(obj) = this else {
        return Err(incompatible_receiver("WeakMap", method));
    };
    let mut object = obj.borrow_mut();
    match object.kind_mut() {
        ObjectKind::WeakMap(entries) => Ok(f(entries)),
        _ => Err(incompatible_receiver("WeakMap", method)),
    }
}

fn weak_get(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = arg(args, 0);
    with_weak_map(this, "get", |entries| match key.as_object() {
        Some(obj) => entries
            .get(&obj.addr())
            .filter(|entry| entry.matches(obj))
            .map(|entry| entry.value().clone())
            .unwrap_or_default(),
        None => Value::Undefined,
    })
}

fn weak_set(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = arg(args, 0);
    let Some(obj) = key.as_object() else {
        return Err(ObjectError::TypeError(format!(
            "Invalid value used as weak map key: {:?}",
            key
        )));
    };
    let value = arg(args, 1);
    with_weak_map(this, "set", |entries| {
        entries.retain(|_, entry| entry.is_alive());
        entries.insert(obj.addr(), WeakEntry::new(obj, value));
    })?;
    Ok(this.clone())
}

fn weak_has(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = arg(args, 0);
    with_weak_map(this, "has", |entries| {
        let found = key
            .as_object()
            .and_then(|obj| entries.get(&obj.addr()).filter(|entry| entry.matches(obj)))
            .is_some();
        Value::Bool(found)
    })
}

fn weak_delete(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let key = arg(args, 0);
    with_weak_map(this, "delete", |entries| {
        let Some(obj) = key.as_object() else {
            return Value::Bool(false);
        };
        let live = entries.get(&obj.addr()).is_some_and(|entry| entry.matches(obj));
        if live {
            entries.remove(&obj.addr());
        }
        Value::Bool(live)
    })
}
