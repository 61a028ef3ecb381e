//! Capability resolver
//!
//! Answers whether a member name is reachable on a value's capability chain.
//! The chain starts at the value's own members, continues with its class and
//! then each parent class, and ends at the root class. The walk always runs
//! over the original value, never over its boxed surrogate.

use std::collections::BTreeSet;

use chainable_object::{ClassRef, Value};

/// One link of a capability chain
enum Link {
    /// Members declared directly on the value
    Own(Value),
    /// Methods and accessors declared by a class
    Class(ClassRef),
}

impl Link {
    /// First link of `original`; null and undefined have none
    fn first(original: &Value) -> Option<Link> {
        if original.is_nullish() {
            None
        } else {
            Some(Link::Own(original.clone()))
        }
    }

    fn declares(&self, name: &str) -> bool {
        match self {
            Link::Own(value) => value.has_own_member(name),
            Link::Class(class) => class.declares(name),
        }
    }

    fn ancestor(&self) -> Option<Link> {
        match self {
            Link::Own(value) => value.class().map(Link::Class),
            Link::Class(class) => class.parent().cloned().map(Link::Class),
        }
    }

    fn label(&self) -> String {
        match self {
            Link::Own(_) => "own".to_string(),
            Link::Class(class) => class.name().to_string(),
        }
    }

    fn names(&self) -> Vec<String> {
        match self {
            Link::Own(value) => value.own_member_names(),
            Link::Class(class) => class.declared_names().map(str::to_string).collect(),
        }
    }
}

fn exists_from(link: Option<Link>, name: &str) -> bool {
    match link {
        None => false,
        Some(link) if link.declares(name) => true,
        Some(link) => exists_from(link.ancestor(), name),
    }
}

/// Check whether `name` is declared anywhere on the capability chain of `original`
pub fn exists(original: &Value, name: &str) -> bool {
    exists_from(Link::first(original), name)
}

fn walk(original: &Value, mut visit: impl FnMut(&Link)) {
    let mut link = Link::first(original);
    while let Some(current) = link {
        visit(&current);
        link = current.ancestor();
    }
}

/// Labels of the links walked for `original`: `"own"`, then class names up to the root
pub fn capability_chain(original: &Value) -> Vec<String> {
    let mut labels = Vec::new();
    walk(original, |link| labels.push(link.label()));
    labels
}

/// Every member name reachable on the capability chain, sorted and de-duplicated
pub fn reachable_members(original: &Value) -> Vec<String> {
    let mut names = BTreeSet::new();
    walk(original, |link| names.extend(link.names()));
    names.into_iter().collect()
}
