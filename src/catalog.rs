//! Type descriptors and the catalog the resolver queries.
//!
//! The catalog is the engine's type-metadata capability: it answers
//! whether an identifier denotes a constructible type, enumerates a
//! type's constructors, and invokes construction. Closed generic
//! instantiations are cataloged individually; closing an open identifier
//! is a symbolic operation on [`ContractId`], and the monomorphized
//! instantiation must already be described here.

use std::collections::HashMap;

use crate::contract::ContractId;
use crate::error::ResolveError;
use crate::instance::Instance;

/// Invocation stored by a [`Constructor`].
pub type BuildFn = Box<dyn Fn(Args) -> Result<Instance, ResolveError>>;

/// Surfacing cast stored by a [`TypeDescriptor`].
pub type CastFn = Box<dyn Fn(Instance) -> Result<Instance, ResolveError>>;

/// Ordered cursor over the resolved arguments handed to a build closure.
pub struct Args {
    items: std::vec::IntoIter<Instance>,
}

impl Args {
    fn new(items: Vec<Instance>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    /// Takes the next argument as a `T`, which must satisfy `expected`.
    pub fn take<T: 'static>(&mut self, expected: &ContractId) -> Result<T, ResolveError> {
        let instance = self
            .items
            .next()
            .ok_or_else(|| ResolveError::MissingArgument(expected.clone()))?;
        instance
            .downcast::<T>()
            .map_err(|_| ResolveError::ArgumentMismatch {
                expected: expected.clone(),
            })
    }
}

/// A constructible shape: ordered dependency contracts plus the
/// invocation that assembles an instance from the resolved arguments.
pub struct Constructor {
    params: Vec<ContractId>,
    build: BuildFn,
}

impl Constructor {
    pub fn new(
        params: Vec<ContractId>,
        build: impl Fn(Args) -> Result<Instance, ResolveError> + 'static,
    ) -> Self {
        Self {
            params,
            build: Box::new(build),
        }
    }

    /// Dependency contracts in declaration order.
    pub fn params(&self) -> &[ContractId] {
        &self.params
    }

    /// Invokes the constructor with fully-resolved arguments.
    ///
    /// Failures raised by the build closure propagate to the original
    /// caller of `resolve` unmodified.
    pub fn invoke(&self, args: Vec<Instance>) -> Result<Instance, ResolveError> {
        (self.build)(Args::new(args))
    }
}

impl std::fmt::Debug for Constructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Metadata for one type: its identifier, whether it can be constructed
/// directly, its constructors, and its surfacing casts.
///
/// A surfacing cast re-boxes a constructed concrete value as the trait
/// object of an abstract contract the type implements, so a caller that
/// requested the abstract contract receives a value usable as it.
pub struct TypeDescriptor {
    id: ContractId,
    constructible: bool,
    constructors: Vec<Constructor>,
    casts: HashMap<ContractId, CastFn>,
}

impl TypeDescriptor {
    /// Descriptor for a directly constructible type.
    pub fn concrete(id: ContractId) -> Self {
        Self {
            id,
            constructible: true,
            constructors: Vec::new(),
            casts: HashMap::new(),
        }
    }

    /// Descriptor for an abstract contract, never constructed directly.
    pub fn abstract_contract(id: ContractId) -> Self {
        Self {
            id,
            constructible: false,
            constructors: Vec::new(),
            casts: HashMap::new(),
        }
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Registers a cast presenting this type as `contract`.
    pub fn with_cast(
        mut self,
        contract: ContractId,
        cast: impl Fn(Instance) -> Result<Instance, ResolveError> + 'static,
    ) -> Self {
        self.casts.insert(contract, Box::new(cast));
        self
    }

    pub fn id(&self) -> &ContractId {
        &self.id
    }

    pub fn is_constructible(&self) -> bool {
        self.constructible
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// The surfacing cast for `contract`, if one is registered.
    pub fn cast_for(&self, contract: &ContractId) -> Option<&CastFn> {
        self.casts.get(contract)
    }
}

/// The engine's type space, keyed by contract identifier.
pub struct Catalog {
    types: HashMap<ContractId, TypeDescriptor>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Adds a descriptor. Fails if the identifier is already described.
    pub fn add(&mut self, descriptor: TypeDescriptor) -> Result<(), ResolveError> {
        if self.types.contains_key(descriptor.id()) {
            return Err(ResolveError::DuplicateType(descriptor.id().clone()));
        }
        tracing::debug!("cataloging {}", descriptor.id());
        self.types.insert(descriptor.id().clone(), descriptor);
        Ok(())
    }

    /// Adds the descriptor of an [`Injectable`](crate::Injectable) type.
    pub fn add_injectable<T: crate::inject::Injectable>(&mut self) -> Result<(), ResolveError> {
        self.add(T::descriptor())
    }

    /// Metadata for an identifier; `None` is a normal miss.
    pub fn describe(&self, id: &ContractId) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    pub fn contains(&self, id: &ContractId) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget {
        size: u32,
    }

    fn widget_descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete(ContractId::simple("Widget")).with_constructor(
            Constructor::new(vec![], |_args| Ok(Instance::new(Widget { size: 1 }))),
        )
    }

    #[test]
    fn test_add_and_describe() {
        let mut catalog = Catalog::new();
        catalog.add(widget_descriptor()).unwrap();

        let descriptor = catalog.describe(&ContractId::simple("Widget")).unwrap();
        assert!(descriptor.is_constructible());
        assert_eq!(descriptor.constructors().len(), 1);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut catalog = Catalog::new();
        catalog.add(widget_descriptor()).unwrap();

        let result = catalog.add(widget_descriptor());
        assert!(matches!(result, Err(ResolveError::DuplicateType(_))));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_describe_miss_is_none() {
        let catalog = Catalog::new();
        assert!(catalog.describe(&ContractId::simple("Widget")).is_none());
    }

    #[test]
    fn test_constructor_invoke() {
        let descriptor = widget_descriptor();
        let constructor = &descriptor.constructors()[0];

        let instance = constructor.invoke(vec![]).unwrap();
        assert_eq!(instance.downcast::<Widget>().unwrap().size, 1);
    }

    #[test]
    fn test_args_take_in_order() {
        let mut args = Args::new(vec![Instance::new(1u32), Instance::new("two".to_string())]);

        let first: u32 = args.take(&ContractId::simple("First")).unwrap();
        let second: String = args.take(&ContractId::simple("Second")).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, "two");
    }

    #[test]
    fn test_args_take_mismatch() {
        let mut args = Args::new(vec![Instance::new(1u32)]);

        let result: Result<String, _> = args.take(&ContractId::simple("First"));
        assert!(matches!(
            result,
            Err(ResolveError::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn test_args_take_exhausted() {
        let mut args = Args::new(vec![]);

        let result: Result<u32, _> = args.take(&ContractId::simple("First"));
        assert!(matches!(result, Err(ResolveError::MissingArgument(_))));
    }

    #[test]
    fn test_abstract_descriptor_is_not_constructible() {
        let descriptor = TypeDescriptor::abstract_contract(ContractId::simple("Logger"));
        assert!(!descriptor.is_constructible());
        assert!(descriptor.constructors().is_empty());
    }

    #[test]
    fn test_cast_for() {
        trait Measurable {}
        impl Measurable for Widget {}

        let descriptor = widget_descriptor().with_cast(
            ContractId::simple("Measurable"),
            |instance| {
                let widget = instance.downcast::<Widget>().map_err(|_| {
                    ResolveError::WrongInstanceType(ContractId::simple("Widget"))
                })?;
                let surfaced: Box<dyn Measurable> = Box::new(widget);
                Ok(Instance::new(surfaced))
            },
        );

        assert!(descriptor
            .cast_for(&ContractId::simple("Measurable"))
            .is_some());
        assert!(descriptor.cast_for(&ContractId::simple("Other")).is_none());

        let cast = descriptor.cast_for(&ContractId::simple("Measurable")).unwrap();
        let surfaced = cast(Instance::new(Widget { size: 2 })).unwrap();
        assert!(surfaced.is::<Box<dyn Measurable>>());
    }
}
