//! Array methods
//!
//! Callback methods iterate over a snapshot of the elements taken when the
//! method starts, so callbacks may freely touch the array itself.

use crate::builtins::{arg, callback, incompatible_receiver, integer_arg, relative_index};
use crate::class::{ClassBuilder, ClassRef};
use crate::object::{ObjectKind, ObjectRef};
use crate::value::{join_elements, Value};
use crate::{ObjectError, ObjectResult};

pub(super) fn array_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Array")
        .extends(object)
        .method("push", push)
        .method("pop", pop)
        .method("shift", shift)
        .method("unshift", unshift)
        .method("map", map)
        .method("filter", filter)
        .method("reduce", reduce)
        .method("forEach", for_each)
        .method("find", find)
        .method("findIndex", find_index)
        .method("some", some)
        .method("every", every)
        .method("indexOf", index_of)
        .method("includes", includes)
        .method("join", join)
        .method("slice", slice)
        .method("reverse", reverse)
        .method("concat", concat)
        .method("toString", to_string)
        .build()
}

fn with_elements_mut<R>(
    this: &Value,
    method: &str,
    f: impl FnOnce(&mut Vec<Value>) -> R,
) -> ObjectResult<R> {
    let Value::Object(obj) = this else {
        return Err(incompatible_receiver("Array", method));
    };
    let mut object = obj.borrow_mut();
    match object.kind_mut() {
        ObjectKind::Array(elements) => Ok(f(elements)),
        _ => Err(incompatible_receiver("Array", method)),
    }
}

fn snapshot(this: &Value, method: &str) -> ObjectResult<Vec<Value>> {
    with_elements_mut(this, method, |elements| elements.clone())
}

/// Invoke `cb(element, index, array)` for every element of the snapshot
fn each_result(this: &Value, method: &str, args: &[Value]) -> ObjectResult<Vec<(Value, Value)>> {
    let cb = callback(args, 0, &format!("Array.prototype.{}", method))?;
    snapshot(this, method)?
        .into_iter()
        .enumerate()
        .map(|(i, element)| -> ObjectResult<(Value, Value)> {
            let result = cb.call(&Value::Undefined, &[element.clone(), Value::from(i), this.clone()])?;
            Ok((element, result))
        })
        .collect()
}

fn push(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    with_elements_mut(this, "push", |elements| {
        elements.extend_from_slice(args);
        Value::from(elements.len())
    })
}

fn pop(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    with_elements_mut(this, "pop", |elements| elements.pop().unwrap_or_default())
}

fn shift(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    with_elements_mut(this, "shift", |elements| {
        if elements.is_empty() {
            Value::Undefined
        } else {
            elements.remove(0)
        }
    })
}

fn unshift(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    with_elements_mut(this, "unshift", |elements| {
        elements.splice(0..0, args.iter().cloned());
        Value::from(elements.len())
    })
}

fn map(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let mapped = each_result(this, "map", args)?;
    Ok(Value::array(mapped.into_iter().map(|(_, result)| result)))
}

fn filter(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let kept = each_result(this, "filter", args)?
        .into_iter()
        .filter(|(_, keep)| keep.is_truthy())
        .map(|(element, _)| element);
    Ok(Value::array(kept))
}

fn reduce(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let cb = callback(args, 0, "Array.prototype.reduce")?;
    let mut elements = snapshot(this, "reduce")?.into_iter().enumerate();
    let mut acc = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match elements.next() {
            Some((_, first)) => first,
            None => {
                return Err(ObjectError::TypeError(
                    "Reduce of empty array with no initial value".to_string(),
                ))
            }
        },
    };
    for (i, element) in elements {
        acc = cb.call(&Value::Undefined, &[acc, element, Value::from(i), this.clone()])?;
    }
    Ok(acc)
}

fn for_each(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    each_result(this, "forEach", args)?;
    Ok(Value::Undefined)
}

// find/findIndex/some/every stop at the first decisive callback result
fn first_match(this: &Value, method: &str, args: &[Value], want: bool) -> ObjectResult<Option<(usize, Value)>> {
    let cb = callback(args, 0, &format!("Array.prototype.{}", method))?;
    for (i, element) in snapshot(this, method)?.into_iter().enumerate() {
        let result = cb.call(&Value::Undefined, &[element.clone(), Value::from(i), this.clone()])?;
        if result.is_truthy() == want {
            return Ok(Some((i, element)));
        }
    }
    Ok(None)
}

fn find(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    Ok(first_match(this, "find", args, true)?.map(|(_, element)| element).into())
}

fn find_index(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let index = first_match(this, "findIndex", args, true)?.map_or(-1, |(i, _)| i as i64);
    Ok(Value::from(index))
}

fn some(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::Bool(first_match(this, "some", args, true)?.is_some()))
}

fn every(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    Ok(Value::Bool(first_match(this, "every", args, false)?.is_none()))
}

fn index_of(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let search = arg(args, 0);
    let elements = snapshot(this, "indexOf")?;
    let start = relative_index(integer_arg(args, 1, 0), elements.len());
    let index = elements[start..]
        .iter()
        .position(|e| e.strict_equals(&search))
        .map_or(-1, |i| (i + start) as i64);
    Ok(Value::from(index))
}

fn includes(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let search = arg(args, 0);
    let found = snapshot(this, "includes")?.iter().any(|e| e.is_same(&search));
    Ok(Value::Bool(found))
}

// The receiver counts as visited, so an element referring back to it joins as ""
fn join_with(this: &Value, method: &str, separator: &str) -> ObjectResult<Value> {
    let elements = snapshot(this, method)?;
    let mut seen: Vec<usize> = this.as_object().map(ObjectRef::addr).into_iter().collect();
    Ok(Value::from(join_elements(&elements, separator, &mut seen)))
}

fn join(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let separator = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        other => other.to_display_string(),
    };
    join_with(this, "join", &separator)
}

fn to_string(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    join_with(this, "toString", ",")
}

fn slice(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let elements = snapshot(this, "slice")?;
    let len = elements.len();
    let start = relative_index(integer_arg(args, 0, 0), len);
    let end = relative_index(integer_arg(args, 1, len as i64), len);
    let sliced = if start < end { elements[start..end].to_vec() } else { Vec::new() };
    Ok(Value::array(sliced))
}

fn reverse(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    with_elements_mut(this, "reverse", |elements| elements.reverse())?;
    Ok(this.clone())
}

fn concat(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let mut result = snapshot(this, "concat")?;
    for item in args {
        match item {
            Value::Object(obj) => match obj.borrow().kind() {
                ObjectKind::Array(elements) => result.extend_from_slice(elements),
                _ => result.push(item.clone()),
            },
            other => result.push(other.clone()),
        }
    }
    Ok(Value::array(result))
}
