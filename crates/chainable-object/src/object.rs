//! Object model: heap objects, own members and keyed collections

use std::cell::{BorrowError, Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::builtins::builtins;
use crate::class::ClassRef;
use crate::value::Value;
use crate::{ObjectError, ObjectResult};

/// Own properties, in insertion order
pub type PropertyMap = IndexMap<String, Value, FxBuildHasher>;

/// Map storage, in insertion order
pub type MapEntries = IndexMap<MapKey, Value, FxBuildHasher>;

/// Set storage, in insertion order
pub type SetMembers = IndexSet<MapKey, FxBuildHasher>;

/// Largest array length accepted by `length` and index writes
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Largest string, in bytes, a built-in method may produce
pub const MAX_STRING_LENGTH: usize = 1 << 28;

/// Weak map storage, keyed by object address
pub type WeakEntries = FxHashMap<usize, WeakEntry>;

/// Internal payload of an object
pub enum ObjectKind {
    /// Plain object (own properties only)
    Ordinary,
    /// Dense sequence
    Array(Vec<Value>),
    /// Key-value store
    Map(MapEntries),
    /// Unique-membership collection
    Set(SetMembers),
    /// Key-value store holding its object keys weakly
    WeakMap(WeakEntries),
    /// Boxed text, numeric or boolean primitive
    Boxed(Value),
}

/// Object instance (heap-allocated)
pub struct Object {
    class: ClassRef,
    kind: ObjectKind,
    properties: PropertyMap,
}

impl Object {
    /// Create a new object of `class` with no own properties
    pub fn new(class: ClassRef, kind: ObjectKind) -> Self {
        Self {
            class,
            kind,
            properties: PropertyMap::default(),
        }
    }

    /// Class this object inherits members from
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Internal payload
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Internal payload (mutable)
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// Own properties
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Check whether `name` is an own member
    pub fn has_own(&self, name: &str) -> bool {
        match &self.kind {
            ObjectKind::Array(elements) => {
                if name == "length" || array_index(name).is_some_and(|i| i < elements.len()) {
                    return true;
                }
            }
            ObjectKind::Boxed(Value::String(s)) => {
                if string_own_member(s, name).is_some() {
                    return true;
                }
            }
            _ => {}
        }
        self.properties.contains_key(name)
    }

    /// Read an own member
    pub fn get_own(&self, name: &str) -> Option<Value> {
        match &self.kind {
            ObjectKind::Array(elements) => {
                if name == "length" {
                    return Some(Value::from(elements.len()));
                }
                if let Some(element) = array_index(name).and_then(|i| elements.get(i)) {
                    return Some(element.clone());
                }
            }
            ObjectKind::Boxed(Value::String(s)) => {
                if let Some(member) = string_own_member(s, name) {
                    return Some(member);
                }
            }
            _ => {}
        }
        self.properties.get(name).cloned()
    }

    /// Create or update an own member
    ///
    /// Array `length` truncates or extends with `undefined`; index writes past
    /// the end extend the array. Character members of a boxed string are
    /// read-only.
    pub fn set_own(&mut self, name: &str, value: Value) -> ObjectResult<()> {
        match &mut self.kind {
            ObjectKind::Array(elements) => {
                if name == "length" {
                    let len = array_length(&value)?;
                    elements.resize(len, Value::Undefined);
                    return Ok(());
                }
                if let Some(index) = array_index(name) {
                    if index >= MAX_ARRAY_LENGTH {
                        return Err(invalid_array_length());
                    }
                    if index >= elements.len() {
                        elements.resize(index + 1, Value::Undefined);
                    }
                    elements[index] = value;
                    return Ok(());
                }
            }
            ObjectKind::Boxed(Value::String(s)) => {
                if string_own_member(s, name).is_some() {
                    return Err(ObjectError::TypeError(format!(
                        "Cannot assign to read only property '{}' of string '{}'",
                        name, s
                    )));
                }
            }
            _ => {}
        }
        self.properties.insert(name.to_string(), value);
        Ok(())
    }

    /// Names of all own members
    pub fn own_member_names(&self) -> Vec<String> {
        let mut names = match &self.kind {
            ObjectKind::Array(elements) => {
                let mut names: Vec<String> = (0..elements.len()).map(|i| i.to_string()).collect();
                names.push("length".to_string());
                names
            }
            ObjectKind::Boxed(Value::String(s)) => string_own_member_names(s),
            _ => Vec::new(),
        };
        names.extend(self.properties.keys().cloned());
        names
    }
}

/// Shared, interiorly mutable reference to an [`Object`]
///
/// Cloning the reference never clones the object; identity is observable via
/// [`ObjectRef::ptr_eq`].
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Wrap an object
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Create an ordinary object of class `Object`
    pub fn ordinary() -> Self {
        Self::new(Object::new(builtins().object.clone(), ObjectKind::Ordinary))
    }

    /// Create an instance of a (usually user-defined) class
    pub fn instance(class: &ClassRef) -> Self {
        Self::new(Object::new(class.clone(), ObjectKind::Ordinary))
    }

    /// Create an array
    pub fn array(elements: Vec<Value>) -> Self {
        Self::new(Object::new(builtins().array.clone(), ObjectKind::Array(elements)))
    }

    /// Create an empty map
    pub fn map() -> Self {
        Self::map_from(std::iter::empty())
    }

    /// Create a map from entries (later duplicates overwrite earlier ones)
    pub fn map_from(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let entries: MapEntries = entries
            .into_iter()
            .map(|(k, v)| (MapKey::new(k), v))
            .collect();
        Self::new(Object::new(builtins().map.clone(), ObjectKind::Map(entries)))
    }

    /// Create a set from values
    pub fn set_from(values: impl IntoIterator<Item = Value>) -> Self {
        let members: SetMembers = values.into_iter().map(MapKey::new).collect();
        Self::new(Object::new(builtins().set.clone(), ObjectKind::Set(members)))
    }

    /// Create an empty weak map
    pub fn weak_map() -> Self {
        Self::new(Object::new(
            builtins().weak_map.clone(),
            ObjectKind::WeakMap(WeakEntries::default()),
        ))
    }

    /// Box a text, numeric or boolean primitive
    ///
    /// Returns `None` for any other value.
    pub fn boxed(primitive: &Value) -> Option<Self> {
        let b = builtins();
        let class = match primitive {
            Value::String(_) => b.string.clone(),
            Value::Number(_) => b.number.clone(),
            Value::Bool(_) => b.boolean.clone(),
            _ => return None,
        };
        Some(Self::new(Object::new(class, ObjectKind::Boxed(primitive.clone()))))
    }

    /// Immutably borrow the object
    ///
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Mutably borrow the object
    ///
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Immutably borrow the object, failing instead of panicking
    pub fn try_borrow(&self) -> Result<Ref<'_, Object>, BorrowError> {
        self.0.try_borrow()
    }

    /// Reference identity
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared object, stable for its lifetime
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Class of the object
    pub fn class(&self) -> ClassRef {
        self.borrow().class.clone()
    }

    /// Check whether `name` is an own member
    pub fn has_own(&self, name: &str) -> bool {
        self.borrow().has_own(name)
    }

    /// Read an own member
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.borrow().get_own(name)
    }

    /// Create or update an own member
    pub fn set_own(&self, name: &str, value: impl Into<Value>) -> ObjectResult<()> {
        self.borrow_mut().set_own(name, value.into())
    }

    /// Names of all own members
    pub fn own_member_names(&self) -> Vec<String> {
        self.borrow().own_member_names()
    }

    /// Structural comparison; a pair already in `seen` counts as equal
    pub(crate) fn deep_eq(&self, other: &ObjectRef, seen: &mut Vec<(usize, usize)>) -> bool {
        let pair = (self.addr(), other.addr());
        if seen.contains(&pair) {
            return true;
        }
        let (Ok(a), Ok(b)) = (self.try_borrow(), other.try_borrow()) else {
            return false;
        };
        if !Arc::ptr_eq(&a.class, &b.class) {
            return false;
        }

        seen.push(pair);
        let kinds_equal = match (&a.kind, &b.kind) {
            (ObjectKind::Ordinary, ObjectKind::Ordinary) => true,
            (ObjectKind::Array(x), ObjectKind::Array(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(v, w)| v.structural_eq(w, seen))
            }
            (ObjectKind::Map(x), ObjectKind::Map(y)) => {
                x.len() == y.len()
                    && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| v.structural_eq(w, seen)))
            }
            (ObjectKind::Set(x), ObjectKind::Set(y)) => {
                x.len() == y.len() && x.iter().all(|k| y.contains(k))
            }
            (ObjectKind::Boxed(x), ObjectKind::Boxed(y)) => x.is_same(y),
            _ => false,
        };
        let equal = kinds_equal
            && a.properties.len() == b.properties.len()
            && a.properties
                .iter()
                .all(|(k, v)| b.properties.get(k).is_some_and(|w| v.structural_eq(w, seen)));
        seen.pop();
        equal
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

/// Entry of a weak map: the key is held weakly, the value strongly
pub struct WeakEntry {
    key: Weak<RefCell<Object>>,
    value: Value,
}

impl WeakEntry {
    /// Create an entry for `key`
    pub fn new(key: &ObjectRef, value: Value) -> Self {
        Self {
            key: Rc::downgrade(&key.0),
            value,
        }
    }

    /// Check whether the key is still alive
    pub fn is_alive(&self) -> bool {
        self.key.strong_count() > 0
    }

    /// Check whether this entry belongs to `key`
    ///
    /// Guards against a dead key whose address was reused by a new object.
    pub fn matches(&self, key: &ObjectRef) -> bool {
        self.is_alive() && std::ptr::eq(self.key.as_ptr(), Rc::as_ptr(&key.0))
    }

    /// Stored value
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Hashable wrapper for values used as map keys and set members
///
/// Uses same-value-zero semantics: primitives compare by content (`NaN`
/// equals `NaN`, `-0` is stored as `0`), objects and functions by identity.
#[derive(Clone, Debug)]
pub struct MapKey(Value);

impl MapKey {
    /// Wrap a value, normalizing `-0` to `0`
    pub fn new(value: Value) -> Self {
        match value {
            Value::Number(n) if n == 0.0 => MapKey(Value::Number(0.0)),
            other => MapKey(other),
        }
    }

    /// Wrapped value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Unwrap the value
    pub fn into_value(self) -> Value {
        self.0
    }
}

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Undefined => 0u8.hash(state),
            Value::Null => 1u8.hash(state),
            Value::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                3u8.hash(state);
                canonical_bits(*n).hash(state);
            }
            Value::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            Value::Object(obj) => {
                5u8.hash(state);
                obj.addr().hash(state);
            }
            Value::Function(f) => {
                6u8.hash(state);
                f.addr().hash(state);
            }
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.is_same(&other.0)
    }
}

impl Eq for MapKey {}

/// Parse a canonical array index (`"0"`, `"17"`; not `"01"` or `"-1"`)
pub fn array_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if name.len() > 1 && name.starts_with('0') {
        return None;
    }
    let index: u32 = name.parse().ok()?;
    (index < u32::MAX).then_some(index as usize)
}

fn array_length(value: &Value) -> ObjectResult<usize> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= MAX_ARRAY_LENGTH as f64 => {
            Ok(*n as usize)
        }
        _ => Err(invalid_array_length()),
    }
}

fn invalid_array_length() -> ObjectError {
    ObjectError::RangeError("Invalid array length".to_string())
}

/// Own member of a string: `length` or a character index
pub(crate) fn string_own_member(s: &str, name: &str) -> Option<Value> {
    if name == "length" {
        return Some(Value::from(s.chars().count()));
    }
    let index = array_index(name)?;
    s.chars().nth(index).map(|c| Value::from(c.to_string()))
}

pub(crate) fn string_own_member_names(s: &str) -> Vec<String> {
    let mut names: Vec<String> = (0..s.chars().count()).map(|i| i.to_string()).collect();
    names.push("length".to_string());
    names
}
