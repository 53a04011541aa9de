//! Contract registry: source to destination mappings.

use std::collections::HashMap;

use crate::contract::{Contract, ContractId};
use crate::error::ResolveError;

/// Mapping from abstract contract identifiers to concrete implementation
/// identifiers.
///
/// Registration is add-only: a second registration for the same source
/// fails rather than overwriting. A lookup miss is a normal negative
/// result, not an error. Populate the registry fully before handing it to
/// a [`Resolver`](crate::Resolver); moving it there ends the registration
/// phase.
pub struct Registry {
    map: HashMap<ContractId, ContractId>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Records that requests for `source` resolve via `destination`.
    ///
    /// The destination is not validated against the source; whether it
    /// actually satisfies the contract is the caller's responsibility.
    pub fn register(
        &mut self,
        source: ContractId,
        destination: ContractId,
    ) -> Result<(), ResolveError> {
        if self.map.contains_key(&source) {
            return Err(ResolveError::DuplicateRegistration(source));
        }
        tracing::debug!("registering {} -> {}", source, destination);
        self.map.insert(source, destination);
        Ok(())
    }

    /// The mapped destination for `source`, if any.
    pub fn lookup(&self, source: &ContractId) -> Option<&ContractId> {
        self.map.get(source)
    }

    /// Fluent registration: declare the source contract, then chain the
    /// destination.
    ///
    /// ```ignore
    /// registry.bind(ContractId::open("Repository"))
    ///     .to(ContractId::open("SqlRepository"))?;
    /// ```
    pub fn bind(&mut self, source: ContractId) -> Binding<'_> {
        Binding {
            registry: self,
            source,
        }
    }

    /// Typed fluent registration from a [`Contract`] implementor.
    pub fn bind_type<S: Contract>(&mut self) -> Binding<'_> {
        self.bind(S::contract())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Pending fluent registration created by [`Registry::bind`].
#[must_use = "a binding does nothing until `to` or `to_type` is called"]
pub struct Binding<'a> {
    registry: &'a mut Registry,
    source: ContractId,
}

impl Binding<'_> {
    /// Completes the registration with the destination contract.
    pub fn to(self, destination: ContractId) -> Result<(), ResolveError> {
        self.registry.register(self.source, destination)
    }

    /// Completes the registration with a [`Contract`] implementor's
    /// identifier.
    pub fn to_type<D: Contract>(self) -> Result<(), ResolveError> {
        self.to(D::contract())
    }
}
