//! Error types for chain handles

use chainable_object::ObjectError;

/// Result type for chained accesses
pub type ChainResult<T> = Result<T, ChainError>;

/// Chain access error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// Strict mode rejected a member missing from the target's capability chain
    #[error("Type error: member '{member}' is not available on the capability chain of {target}")]
    UnresolvableMember {
        /// Requested member name
        member: String,
        /// Type name of the wrapped value
        target: String,
    },

    /// A reserved introspection name was used as a chain step
    #[error("'{0}' is a reserved introspection member and cannot be chained")]
    ReservedMember(String),

    /// Failure raised by the forwarded operation, passed through unchanged
    #[error(transparent)]
    Operation(#[from] ObjectError),
}

impl ChainError {
    /// Member name carried by an unresolvable-member or reserved-member error
    pub fn member(&self) -> Option<&str> {
        match self {
            ChainError::UnresolvableMember { member, .. } => Some(member),
            ChainError::ReservedMember(member) => Some(member),
            ChainError::Operation(_) => None,
        }
    }
}
