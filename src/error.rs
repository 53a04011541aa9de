//! Engine error types.

use thiserror::Error;

use crate::contract::ContractId;

/// Errors produced by registration, cataloging, and resolution.
///
/// Every error is fatal to the requesting call: there is no retry and no
/// fallback beyond the resolver's decision procedure itself.
#[derive(Error, Debug)]
pub enum ResolveError {
    // Resolution errors
    #[error("Could not resolve {0}")]
    Unresolvable(ContractId),

    #[error("Contract already registered: {0}")]
    DuplicateRegistration(ContractId),

    #[error("Type already described: {0}")]
    DuplicateType(ContractId),

    // Type-metadata errors
    #[error("No type descriptor for {0}")]
    UnknownType(ContractId),

    #[error("Type is not constructible: {0}")]
    NotConstructible(ContractId),

    #[error("Type has no constructor: {0}")]
    NoConstructor(ContractId),

    #[error("Constructor ran out of arguments; expected one for {0}")]
    MissingArgument(ContractId),

    #[error("Constructor argument does not satisfy {expected}")]
    ArgumentMismatch { expected: ContractId },

    #[error("Not a generic contract: {0}")]
    NotGeneric(ContractId),

    #[error("Resolved instance for {0} is not of the requested type")]
    WrongInstanceType(ContractId),

    #[error("Invalid contract '{text}': {reason}")]
    InvalidContract { text: String, reason: String },

    // Constructor-body failures propagate unmodified
    #[error(transparent)]
    Construction(Box<dyn std::error::Error + Send + Sync>),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl ResolveError {
    /// Wraps a constructor-body failure for transparent propagation.
    pub fn construction(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Construction(Box::new(err))
    }
}
