//! JSON export of values
//!
//! `undefined`, functions and non-finite numbers become `null`; maps become
//! arrays of `[key, value]` pairs; sets become arrays; boxed primitives export
//! as the primitive. An object reached again while already being exported
//! becomes the string `"[Circular]"`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as JsonValue};

use crate::object::ObjectKind;
use crate::value::Value;

/// Convert a value into a JSON tree
pub fn to_json(value: &Value) -> JsonValue {
    let mut path = Vec::new();
    convert(value, &mut path)
}

fn convert(value: &Value, path: &mut Vec<usize>) -> JsonValue {
    match value {
        Value::Undefined | Value::Null | Value::Function(_) => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Object(obj) => {
            let addr = obj.addr();
            if path.contains(&addr) {
                return JsonValue::String("[Circular]".to_string());
            }
            let Ok(object) = obj.try_borrow() else {
                return JsonValue::Null;
            };

            path.push(addr);
            let json = match object.kind() {
                ObjectKind::Array(elements) => {
                    JsonValue::Array(elements.iter().map(|e| convert(e, path)).collect())
                }
                ObjectKind::Map(entries) => JsonValue::Array(
                    entries
                        .iter()
                        .map(|(k, v)| JsonValue::Array(vec![convert(k.value(), path), convert(v, path)]))
                        .collect(),
                ),
                ObjectKind::Set(members) => {
                    JsonValue::Array(members.iter().map(|m| convert(m.value(), path)).collect())
                }
                ObjectKind::WeakMap(_) => JsonValue::Object(Map::new()),
                ObjectKind::Boxed(inner) => convert(inner, path),
                ObjectKind::Ordinary => {
                    let mut map = Map::new();
                    for (name, property) in object.properties() {
                        map.insert(name.clone(), convert(property, path));
                    }
                    JsonValue::Object(map)
                }
            };
            path.pop();
            json
        }
    }
}

fn number_to_json(n: f64) -> JsonValue {
    // 2^53: largest range where every integer is exactly representable
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        JsonValue::from(n as i64)
    } else {
        Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}
