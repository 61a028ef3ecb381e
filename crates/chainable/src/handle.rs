//! Chain handles
//!
//! A [`ChainHandle`] stands in for a wrapped value. Every member access goes
//! through [`ChainHandle::get`], which answers one of three ways:
//!
//! - the two introspection names return the original value or the ledger
//! - a member resolving to a function becomes an operation link
//! - anything else becomes a data accessor link
//!
//! Calling a link forwards to the value, records the produced value in the
//! ledger and hands back the same handle, so steps compose with `?`:
//!
//! ```ignore
//! let mut chain = wrap(Value::array([1, 2, 3]));
//! chain.call("push", &[4.into()])?.read("length")?;
//! assert_eq!(chain.chain_value_at(1), Value::from(4));
//! ```

use chainable_object::{find_member, get_member, set_member, Function, MemberSlot, Value};
use tracing::{debug, trace};

use crate::config::ChainOptions;
use crate::error::{ChainError, ChainResult};
use crate::ledger::Ledger;
use crate::normalize::normalize;
use crate::resolver::{exists, reachable_members};
use crate::{GET_CHAIN_REFERENCE, GET_CHAIN_VALUE_AT};

/// Fluent handle bound to one wrapped value and one ledger
#[derive(Debug)]
pub struct ChainHandle {
    /// Value as supplied by the caller
    source: Value,
    /// Object-shaped stand-in that members are forwarded to
    surrogate: Value,
    ledger: Ledger,
    options: ChainOptions,
}

/// Result of a member access on a chain handle
#[derive(Debug)]
pub enum Member<'h> {
    /// `getChainReference`: the original value
    Reference(&'h Value),
    /// `getChainValueAt`: the ledger, indexed with [`Ledger::at`]
    ValueAt(&'h Ledger),
    /// Any other member
    Link(Link<'h>),
}

/// Pending chain step for one member
#[derive(Debug)]
pub struct Link<'h> {
    handle: &'h mut ChainHandle,
    name: String,
    kind: LinkKind,
}

#[derive(Debug)]
enum LinkKind {
    Operation(Function),
    Accessor,
}

impl ChainHandle {
    pub(crate) fn new(source: Value, options: ChainOptions) -> Self {
        let surrogate = normalize(&source);
        debug!(
            target_type = %describe(&source),
            strict = options.strict,
            "wrapped value in chain handle"
        );
        Self {
            source,
            surrogate,
            ledger: Ledger::new(),
            options,
        }
    }

    /// Access member `name`
    ///
    /// Reserved introspection names are answered directly. Any other name is
    /// checked against the capability chain when strict mode is on, then
    /// classified as an operation or a data accessor.
    pub fn get(&mut self, name: &str) -> ChainResult<Member<'_>> {
        match name {
            GET_CHAIN_REFERENCE => Ok(Member::Reference(&self.source)),
            GET_CHAIN_VALUE_AT => Ok(Member::ValueAt(&self.ledger)),
            _ => self.link(name).map(Member::Link),
        }
    }

    /// Access member `name` and call it with `args`
    pub fn call(&mut self, name: &str, args: &[Value]) -> ChainResult<&mut Self> {
        if is_reserved(name) {
            return Err(ChainError::ReservedMember(name.to_string()));
        }
        self.link(name)?.call(args)
    }

    /// Call member `name` with no arguments
    pub fn read(&mut self, name: &str) -> ChainResult<&mut Self> {
        self.call(name, &[])
    }

    /// Call member `name` with `value` as its only argument
    pub fn write(&mut self, name: &str, value: impl Into<Value>) -> ChainResult<&mut Self> {
        self.call(name, &[value.into()])
    }

    /// Original value, unboxed
    pub fn chain_reference(&self) -> &Value {
        &self.source
    }

    /// Value recorded by step `index`, or `undefined` when out of range
    pub fn chain_value_at(&self, index: usize) -> Value {
        self.ledger.at(index)
    }

    /// Recorded step values
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Options captured when the handle was created
    pub fn options(&self) -> ChainOptions {
        self.options
    }

    /// Every member name reachable through this handle, including the reserved ones
    pub fn member_names(&self) -> Vec<String> {
        let mut names = reachable_members(&self.source);
        names.extend([GET_CHAIN_REFERENCE.to_string(), GET_CHAIN_VALUE_AT.to_string()]);
        names.sort();
        names.dedup();
        names
    }

    fn link(&mut self, name: &str) -> ChainResult<Link<'_>> {
        if self.options.strict && !exists(&self.source, name) {
            let target = describe(&self.source);
            debug!(member = name, target = %target, "strict mode rejected member");
            return Err(ChainError::UnresolvableMember {
                member: name.to_string(),
                target,
            });
        }

        let kind = match find_member(&self.surrogate, name) {
            MemberSlot::Method(method) => LinkKind::Operation(Function::from_method(name, &method)),
            MemberSlot::Own(Value::Function(function)) => LinkKind::Operation(function),
            MemberSlot::Own(_) | MemberSlot::Accessor(_) | MemberSlot::Absent => LinkKind::Accessor,
        };
        Ok(Link {
            handle: self,
            name: name.to_string(),
            kind,
        })
    }
}

impl<'h> Link<'h> {
    /// Member name this link forwards to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether this link applies an operation rather than a data accessor
    pub fn is_operation(&self) -> bool {
        matches!(self.kind, LinkKind::Operation(_))
    }

    /// Run the step and record its value
    ///
    /// Operations are applied to the wrapped value with `args`. Data accessors
    /// read the member when `args` is empty and otherwise write `args[0]` and
    /// record it. A failing step records nothing.
    pub fn call(self, args: &[Value]) -> ChainResult<&'h mut ChainHandle> {
        let Link { handle, name, kind } = self;
        let target = &handle.surrogate;

        let value = match kind {
            LinkKind::Operation(function) => function.call(target, args)?,
            LinkKind::Accessor => match args.first() {
                None => get_member(target, &name)?,
                Some(assigned) => {
                    set_member(target, &name, assigned.clone())?;
                    assigned.clone()
                }
            },
        };

        let index = handle.ledger.append(value);
        trace!(member = %name, index, "recorded chain step");
        Ok(handle)
    }
}

fn is_reserved(name: &str) -> bool {
    name == GET_CHAIN_REFERENCE || name == GET_CHAIN_VALUE_AT
}

/// Class name of `value`, or its type name when it has no class
fn describe(value: &Value) -> String {
    match value.class() {
        Some(class) => class.name().to_string(),
        None => value.type_name().to_string(),
    }
}
