//! Derive macros for describing injectable types to Syndesis.
//!
//! This crate provides two derives:
//! - `#[derive(Contract)]` to bind a type to its contract identifier
//! - `#[derive(Injectable)]` to generate a type descriptor from a struct's
//!   fields
//!
//! Generated code references the core types (`Contract`, `ContractId`,
//! `TypeDescriptor`, ...) through `crate::`-rooted paths. The consuming
//! crate must re-export them at its root; the `syndesis` crate does.

use proc_macro::TokenStream;

mod contract;
mod injectable;

/// Derive macro binding a type to its contract identifier.
///
/// For a plain struct the contract is `Simple` with the type's name. For a
/// generic struct the contract is `Generic` with one argument per type
/// parameter, and every type parameter is bound by `Contract`, so each
/// monomorphized instantiation carries a distinct closed identifier.
///
/// # Example
///
/// ```ignore
/// use syndesis::{Contract, ContractId};
///
/// #[derive(Contract)]
/// struct SqlConnection;
/// // SqlConnection::contract() == ContractId::simple("SqlConnection")
///
/// #[derive(Contract)]
/// struct SqlRepository<E> {
///     connection: SqlConnection,
///     seed: E,
/// }
/// // SqlRepository::<Customer>::contract()
/// //     == ContractId::generic("SqlRepository", vec![Customer::contract()])
/// ```
///
/// Trait-object contracts cannot be derived; implement `Contract` for the
/// boxed form by hand:
///
/// ```ignore
/// impl Contract for Box<dyn Logger> {
///     fn contract() -> ContractId {
///         ContractId::simple("Logger")
///     }
/// }
/// ```
#[proc_macro_derive(Contract)]
pub fn derive_contract(input: TokenStream) -> TokenStream {
    contract::derive_contract_impl(input)
}

/// Derive macro for types constructible by the resolver.
///
/// Generates a `TypeDescriptor` with a single constructor whose parameter
/// list is the struct's field contracts in declaration order, and whose
/// build closure takes each resolved argument by typed downcast.
///
/// # Requirements
///
/// - The type must also implement `Contract` (usually derived)
/// - Each field type must implement `Contract`
///
/// # Example
///
/// ```ignore
/// use syndesis::{Contract, Injectable};
///
/// #[derive(Contract, Injectable)]
/// struct Scheduler {
///     clock: Box<dyn Clock>,   // resolved by the "Clock" contract
///     queue: JobQueue,         // resolved by the "JobQueue" contract
/// }
/// ```
///
/// # Surfacing casts
///
/// An `#[implements(...)]` attribute lists boxed trait-object contracts
/// this type can be surfaced as. When the resolver constructs the type for
/// a mapped abstract contract, the matching cast re-boxes the instance as
/// the trait object:
///
/// ```ignore
/// #[derive(Contract, Injectable)]
/// #[implements(Box<dyn Clock>)]
/// struct FixedClock;
/// ```
#[proc_macro_derive(Injectable, attributes(implements))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}
