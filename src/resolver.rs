//! Recursive contract resolution.
//!
//! The resolver turns a requested contract into a fully-constructed
//! instance. Deciding the concrete construction target follows a strict
//! rule order:
//!
//! 1. Direct mapping: a registered destination is the construction
//!    target, taken as final (never re-resolved through the registry).
//! 2. Concrete fallback: a cataloged constructible type constructs
//!    itself, no mapping needed.
//! 3. Open-generic mapping: a closed generic whose open form is mapped
//!    closes the mapped destination with its own type arguments.
//! 4. Otherwise the request is unresolvable.
//!
//! Construction picks the richest constructor (greatest parameter count)
//! and resolves each parameter contract recursively, left to right. There
//! is no cycle detection: a cyclic dependency graph recurses until stack
//! exhaustion.

use serde::Serialize;

use crate::catalog::{Catalog, Constructor};
use crate::contract::{Contract, ContractId};
use crate::error::ResolveError;
use crate::instance::Instance;
use crate::registry::Registry;

/// Resolves contracts into fully-constructed instances.
///
/// Owns the registry and catalog for its lifetime: constructing the
/// resolver ends the registration phase, so every `resolve` call runs
/// against a fixed mapping table and type space.
pub struct Resolver {
    registry: Registry,
    catalog: Catalog,
}

/// Derived construction view for a requested contract: the decided
/// concrete target and the chosen constructor's dependency contracts in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructionPlan {
    pub requested: ContractId,
    pub target: ContractId,
    pub dependencies: Vec<ContractId>,
}

impl Resolver {
    pub fn new(registry: Registry, catalog: Catalog) -> Self {
        Self { registry, catalog }
    }

    /// Resolves `requested` into a newly constructed instance.
    ///
    /// Each call is a stateless recursive computation; repeated calls for
    /// the same contract produce independent instances.
    pub fn resolve(&self, requested: &ContractId) -> Result<Instance, ResolveError> {
        let target = self.target_for(requested)?;
        let instance = self.construct(&target)?;
        self.surface(instance, &target, requested)
    }

    /// Typed convenience: resolves `T`'s contract and downcasts the
    /// instance to `T`.
    pub fn resolve_as<T: Contract>(&self) -> Result<T, ResolveError> {
        let requested = T::contract();
        self.resolve(&requested)?
            .downcast::<T>()
            .map_err(|_| ResolveError::WrongInstanceType(requested))
    }

    /// The construction `resolve` would perform, without performing it.
    pub fn plan(&self, requested: &ContractId) -> Result<ConstructionPlan, ResolveError> {
        let target = self.target_for(requested)?;
        let constructor = self.constructor_for(&target)?;
        Ok(ConstructionPlan {
            requested: requested.clone(),
            target,
            dependencies: constructor.params().to_vec(),
        })
    }

    /// Decides the concrete construction target for a requested contract.
    fn target_for(&self, requested: &ContractId) -> Result<ContractId, ResolveError> {
        if let Some(destination) = self.registry.lookup(requested) {
            tracing::debug!("resolving {} via mapping to {}", requested, destination);
            return Ok(destination.clone());
        }

        if let Some(descriptor) = self.catalog.describe(requested) {
            if descriptor.is_constructible() {
                tracing::debug!("resolving {} as its own concrete type", requested);
                return Ok(requested.clone());
            }
        }

        if requested.is_closed_generic() {
            if let Some(open) = requested.open_form() {
                if let Some(destination) = self.registry.lookup(&open) {
                    let closed = destination.close_with(requested.type_args())?;
                    tracing::debug!(
                        "resolving {} via open mapping {} -> {}",
                        requested,
                        open,
                        closed
                    );
                    return Ok(closed);
                }
            }
        }

        Err(ResolveError::Unresolvable(requested.clone()))
    }

    /// The richest constructor of a concrete target.
    ///
    /// The winner among equal-arity constructors is implementation-defined
    /// and must not be relied on.
    fn constructor_for(&self, target: &ContractId) -> Result<&Constructor, ResolveError> {
        let descriptor = self
            .catalog
            .describe(target)
            .ok_or_else(|| ResolveError::UnknownType(target.clone()))?;
        if !descriptor.is_constructible() {
            return Err(ResolveError::NotConstructible(target.clone()));
        }
        descriptor
            .constructors()
            .iter()
            .max_by_key(|constructor| constructor.params().len())
            .ok_or_else(|| ResolveError::NoConstructor(target.clone()))
    }

    /// Constructs a concrete target, resolving every dependency first.
    fn construct(&self, target: &ContractId) -> Result<Instance, ResolveError> {
        let constructor = self.constructor_for(target)?;
        tracing::trace!(
            "constructing {} with {} dependencies",
            target,
            constructor.params().len()
        );
        let mut args = Vec::with_capacity(constructor.params().len());
        for param in constructor.params() {
            args.push(self.resolve(param)?);
        }
        constructor.invoke(args)
    }

    /// Applies the target's surfacing cast for the requested contract, if
    /// one is registered; otherwise the concrete instance passes through.
    fn surface(
        &self,
        instance: Instance,
        target: &ContractId,
        requested: &ContractId,
    ) -> Result<Instance, ResolveError> {
        if target == requested {
            return Ok(instance);
        }
        match self.catalog.describe(target).and_then(|d| d.cast_for(requested)) {
            Some(cast) => cast(instance),
            None => Ok(instance),
        }
    }
}
