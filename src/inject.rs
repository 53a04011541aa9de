//! Injectable types: self-describing constructible shapes.
//!
//! This module is the seam between Rust structs and the engine's type
//! space, using the `Injectable` trait and derive macros from
//! `wire-macros`.
//!
//! # Overview
//!
//! - `Contract` (derive): binds a type to its [`ContractId`](crate::ContractId)
//! - `Injectable` (derive): generates a [`TypeDescriptor`](crate::TypeDescriptor)
//!   from a struct's named fields
//! - `#[implements(Box<dyn Trait>)]`: adds surfacing casts for abstract
//!   contracts the type implements
//!
//! # Example
//!
//! ```ignore
//! use syndesis::{Catalog, Contract, Injectable};
//!
//! #[derive(Contract, Injectable)]
//! #[implements(Box<dyn Clock>)]
//! struct FixedClock;
//!
//! #[derive(Contract, Injectable)]
//! struct Scheduler {
//!     clock: Box<dyn Clock>,  // resolved by the "Clock" contract
//! }
//!
//! let mut catalog = Catalog::new();
//! catalog.add_injectable::<FixedClock>()?;
//! catalog.add_injectable::<Scheduler>()?;
//! ```

use crate::catalog::TypeDescriptor;
use crate::contract::Contract;

/// Types that can describe their constructible shape to a
/// [`Catalog`](crate::Catalog).
///
/// The derived implementation produces a single constructor whose
/// parameters are the struct's field contracts in declaration order.
/// Multi-constructor descriptors are written by hand with
/// [`TypeDescriptor::with_constructor`].
pub trait Injectable: Contract + Sized {
    fn descriptor() -> TypeDescriptor;
}

// Re-export derive macros
pub use wire_macros::{Contract, Injectable};
