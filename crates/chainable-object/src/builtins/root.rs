//! `Object` (root of every hierarchy) and `Function`

use crate::builtins::{arg, incompatible_receiver};
use crate::class::{ClassBuilder, ClassRef};
use crate::object::ObjectKind;
use crate::value::Value;
use crate::ObjectResult;

pub(super) fn object_class() -> ClassRef {
    ClassBuilder::new("Object")
        .method("hasOwnProperty", has_own_property)
        .method("toString", to_string)
        .method("valueOf", value_of)
        .build_root()
}

pub(super) fn function_class(object: &ClassRef) -> ClassRef {
    ClassBuilder::new("Function")
        .extends(object)
        .method("call", call)
        .build()
}

fn has_own_property(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let name = arg(args, 0).to_display_string();
    Ok(Value::Bool(this.has_own_member(&name)))
}

fn to_string(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    let class_name = this
        .class()
        .map(|class| class.name().to_string())
        .unwrap_or_else(|| (if this.is_null() { "Null" } else { "Undefined" }).to_string());
    Ok(Value::from(format!("[object {}]", class_name)))
}

fn value_of(this: &Value, _args: &[Value]) -> ObjectResult<Value> {
    if let Value::Object(obj) = this {
        if let ObjectKind::Boxed(inner) = obj.borrow().kind() {
            return Ok(inner.clone());
        }
    }
    Ok(this.clone())
}

fn call(this: &Value, args: &[Value]) -> ObjectResult<Value> {
    let Value::Function(f) = this else {
        return Err(incompatible_receiver("Function", "call"));
    };
    let receiver = arg(args, 0);
    f.call(&receiver, args.get(1..).unwrap_or_default())
}
