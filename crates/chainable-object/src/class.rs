//! Class definitions and the class builder
//!
//! A class is a declared member table (methods and accessors) plus an
//! optional parent link. Classes are immutable once built and shared as
//! [`ClassRef`], so they can live in process-wide statics.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::builtins::builtins;
use crate::value::Value;
use crate::ObjectResult;

/// Shared class handle
pub type ClassRef = Arc<Class>;

type NativeMethod = dyn Fn(&Value, &[Value]) -> ObjectResult<Value> + Send + Sync;
type NativeGetter = dyn Fn(&Value) -> ObjectResult<Value> + Send + Sync;
type NativeSetter = dyn Fn(&Value, Value) -> ObjectResult<()> + Send + Sync;

/// Method declared on a class
#[derive(Clone)]
pub struct Method(Arc<NativeMethod>);

impl Method {
    /// Create a method from a native function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the method on receiver `this`
    pub fn call(&self, this: &Value, args: &[Value]) -> ObjectResult<Value> {
        (self.0)(this, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Method")
    }
}

/// Data accessor declared on a class (getter with optional setter)
#[derive(Clone)]
pub struct Accessor {
    getter: Arc<NativeGetter>,
    setter: Option<Arc<NativeSetter>>,
}

impl Accessor {
    /// Create a read-only accessor
    pub fn read_only<G>(getter: G) -> Self
    where
        G: Fn(&Value) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: None,
        }
    }

    /// Create a read-write accessor
    pub fn read_write<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn(&Value) -> ObjectResult<Value> + Send + Sync + 'static,
        S: Fn(&Value, Value) -> ObjectResult<()> + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: Some(Arc::new(setter)),
        }
    }

    /// Read through the getter
    pub fn get(&self, this: &Value) -> ObjectResult<Value> {
        (self.getter)(this)
    }

    /// Write through the setter; `None` when the accessor is read-only
    pub fn set(&self, this: &Value, value: Value) -> Option<ObjectResult<()>> {
        self.setter.as_ref().map(|setter| setter(this, value))
    }

    /// Whether a setter is declared
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// Class definition metadata
pub struct Class {
    name: String,
    parent: Option<ClassRef>,
    methods: IndexMap<String, Method, FxBuildHasher>,
    accessors: IndexMap<String, Accessor, FxBuildHasher>,
}

impl Class {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class (None for the root class)
    pub fn parent(&self) -> Option<&ClassRef> {
        self.parent.as_ref()
    }

    /// Method declared directly on this class
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Accessor declared directly on this class
    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }

    /// Check whether `name` is declared directly on this class
    pub fn declares(&self, name: &str) -> bool {
        self.methods.contains_key(name) || self.accessors.contains_key(name)
    }

    /// Names declared directly on this class (methods first, then accessors)
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.methods
            .keys()
            .chain(self.accessors.keys())
            .map(String::as_str)
    }

    /// This class followed by each ancestor up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Check if this class is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| std::ptr::eq(class, other))
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("members", &self.declared_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Iterator over a class hierarchy, from the class itself to the root
pub struct Ancestors<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let class = self.next?;
        self.next = class.parent.as_deref();
        Some(class)
    }
}

/// Builder for constructing a class
///
/// ```ignore
/// let point = ClassBuilder::new("Point")
///     .method("norm", |this, _args| { /* ... */ })
///     .build();
/// ```
pub struct ClassBuilder {
    name: String,
    parent: Option<ClassRef>,
    methods: IndexMap<String, Method, FxBuildHasher>,
    accessors: IndexMap<String, Accessor, FxBuildHasher>,
}

impl ClassBuilder {
    /// Create a new class builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            methods: IndexMap::default(),
            accessors: IndexMap::default(),
        }
    }

    /// Set the parent class (defaults to `Object`)
    pub fn extends(mut self, parent: &ClassRef) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Declare a method (a later declaration with the same name wins)
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Method::new(f));
        self
    }

    /// Declare a read-only accessor
    pub fn getter<G>(mut self, name: impl Into<String>, getter: G) -> Self
    where
        G: Fn(&Value) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Accessor::read_only(getter));
        self
    }

    /// Declare a read-write accessor
    pub fn accessor<G, S>(mut self, name: impl Into<String>, getter: G, setter: S) -> Self
    where
        G: Fn(&Value) -> ObjectResult<Value> + Send + Sync + 'static,
        S: Fn(&Value, Value) -> ObjectResult<()> + Send + Sync + 'static,
    {
        self.accessors
            .insert(name.into(), Accessor::read_write(getter, setter));
        self
    }

    /// Finalize the class
    pub fn build(self) -> ClassRef {
        let parent = self.parent.unwrap_or_else(|| builtins().object.clone());
        Arc::new(Class {
            name: self.name,
            parent: Some(parent),
            methods: self.methods,
            accessors: self.accessors,
        })
    }

    /// Finalize a class with no parent
    pub(crate) fn build_root(self) -> ClassRef {
        Arc::new(Class {
            name: self.name,
            parent: None,
            methods: self.methods,
            accessors: self.accessors,
        })
    }
}
