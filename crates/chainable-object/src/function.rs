//! Callable values

use std::fmt;
use std::rc::Rc;

use crate::class::Method;
use crate::value::Value;
use crate::ObjectResult;

type NativeCall = dyn Fn(&Value, &[Value]) -> ObjectResult<Value>;

/// Shared callable value
///
/// Invoked with a receiver (`this`) and positional arguments. Callbacks
/// passed to container methods receive `undefined` as their receiver.
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    call: Rc<NativeCall>,
}

impl Function {
    /// Create a named function
    pub fn new<F>(name: impl AsRef<str>, f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ObjectResult<Value> + 'static,
    {
        Self {
            name: Rc::from(name.as_ref()),
            call: Rc::new(f),
        }
    }

    /// Create an anonymous function that ignores its receiver
    pub fn anonymous<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> ObjectResult<Value> + 'static,
    {
        Self::new("anonymous", move |_this, args| f(args))
    }

    /// Expose a class method as a function value
    pub fn from_method(name: impl AsRef<str>, method: &Method) -> Self {
        let method = method.clone();
        Self::new(name, move |this, args| method.call(this, args))
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with receiver `this`
    pub fn call(&self, this: &Value, args: &[Value]) -> ObjectResult<Value> {
        (self.call)(this, args)
    }

    /// Reference identity
    pub fn ptr_eq(&self, other: &Function) -> bool {
        self.addr() == other.addr()
    }

    /// Address of the shared closure
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.call) as *const () as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}
