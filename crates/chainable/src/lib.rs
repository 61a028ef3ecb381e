//! Chainable
//!
//! Wraps any value in a fluent handle. Each member access on the handle is
//! forwarded to the value, the produced value is appended to a ledger, and the
//! same handle comes back so the next step can follow:
//!
//! ```ignore
//! use chainable::{wrap, Value};
//!
//! let mut chain = wrap(Value::map());
//! chain
//!     .call("set", &["key1".into(), "val1".into()])?
//!     .read("size")?
//!     .call("get", &["key1".into()])?;
//!
//! assert_eq!(chain.chain_value_at(1), Value::from(1));
//! assert_eq!(chain.chain_value_at(2), Value::from("val1"));
//! ```
//!
//! Text, numeric and boolean primitives are boxed before wrapping, while
//! [`ChainHandle::chain_reference`] keeps returning the primitive itself. In
//! strict mode (the default) a member missing from the value's capability
//! chain fails before anything is recorded.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handle;
pub mod ledger;
pub mod normalize;
pub mod resolver;

pub use chainable_object::{
    builtins, Class, ClassBuilder, ClassRef, Function, ObjectError, ObjectRef, ObjectResult, Value,
};
pub use config::{default_strict, set_default_strict, ChainOptions, STRICT_ENV_VAR};
pub use error::{ChainError, ChainResult};
pub use handle::{ChainHandle, Link, Member};
pub use ledger::Ledger;
pub use normalize::normalize;
pub use resolver::{capability_chain, exists, reachable_members};

/// Reserved member returning the wrapped value
pub const GET_CHAIN_REFERENCE: &str = "getChainReference";

/// Reserved member looking up a recorded step value
pub const GET_CHAIN_VALUE_AT: &str = "getChainValueAt";

/// Wrap `source` using the process-wide default options
pub fn wrap(source: impl Into<Value>) -> ChainHandle {
    wrap_with(source, ChainOptions::default())
}

/// Wrap `source` with explicit options
pub fn wrap_with(source: impl Into<Value>, options: ChainOptions) -> ChainHandle {
    ChainHandle::new(source.into(), options)
}
