//! Syndesis - minimal dependency-resolution engine.
//!
//! Given an abstract request for "an instance that satisfies contract T",
//! Syndesis locates or constructs a concrete instance satisfying T,
//! recursively resolving any constructor dependencies that instance
//! requires. Application wiring code uses it to avoid hand-writing object
//! graphs.
//!
//! A [`Registry`] maps abstract contracts to implementations, a
//! [`Catalog`] describes how concrete types are built, and a [`Resolver`]
//! owns both and walks the dependency graph on demand.

pub mod catalog;
pub mod config;
pub mod contract;
pub mod error;
pub mod inject;
pub mod instance;
pub mod registry;
pub mod resolver;

// Re-export core types at the crate root for wire-macros generated code
pub use catalog::{Args, Catalog, Constructor, TypeDescriptor};
pub use config::{BindingSpec, ConfigError, WiringConfig};
pub use contract::{Contract, ContractId};
pub use error::ResolveError;
pub use inject::Injectable;
pub use instance::Instance;
pub use registry::{Binding, Registry};
pub use resolver::{ConstructionPlan, Resolver};

// Derive macro for Contract; the Injectable derive rides along with the
// trait re-export above (inject re-exports both from wire-macros)
pub use inject::Contract;
