//! Activation and wrapper strategy types.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::descriptors::TypeDescriptor;
use crate::key::LocateKey;

/// Process-unique strategy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrategyId(u64);

impl StrategyId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strategy-{}", self.0)
    }
}

/// Predicate narrowing which strategies a request may use.
pub type ActivationStrategyFilter = Arc<dyn Fn(&ActivationStrategy) -> bool + Send + Sync>;

/// Anything stored in a strategy collection.
pub trait Strategy: Send + Sync {
    /// Type the strategy is registered under.
    fn activation_type(&self) -> &TypeDescriptor;

    /// Key for keyed registrations.
    fn locate_key(&self) -> Option<&LocateKey> {
        None
    }
}

/// A registered recipe producing values of one exported type.
///
/// The recipe itself (constructor selection, factories, lifetimes) belongs
/// to the compiler layer; the resolvability engine only needs to know what
/// is exported and under which key.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{ActivationStrategy, Strategy, TypeDescriptor, LocateKey};
///
/// let sql = TypeDescriptor::class("app::SqlStore");
/// let store = TypeDescriptor::interface("app::Store");
///
/// let strategy = ActivationStrategy::new(sql.clone())
///     .export_as(store.clone())
///     .with_key("primary");
///
/// assert_eq!(strategy.implementation_type(), &sql);
/// assert_eq!(strategy.activation_type(), &store);
/// assert_eq!(strategy.locate_key(), Some(&LocateKey::from("primary")));
/// ```
#[derive(Debug, Clone)]
pub struct ActivationStrategy {
    id: StrategyId,
    implementation_type: TypeDescriptor,
    export_as: TypeDescriptor,
    key: Option<LocateKey>,
}

impl ActivationStrategy {
    /// Strategy exporting `implementation_type` as itself.
    pub fn new(implementation_type: TypeDescriptor) -> Self {
        Self {
            id: StrategyId::next(),
            export_as: implementation_type.clone(),
            implementation_type,
            key: None,
        }
    }

    pub fn export_as(mut self, ty: TypeDescriptor) -> Self {
        self.export_as = ty;
        self
    }

    pub fn with_key(mut self, key: impl Into<LocateKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn id(&self) -> StrategyId {
        self.id
    }

    /// Concrete type the strategy builds.
    pub fn implementation_type(&self) -> &TypeDescriptor {
        &self.implementation_type
    }
}

impl Strategy for ActivationStrategy {
    fn activation_type(&self) -> &TypeDescriptor {
        &self.export_as
    }

    fn locate_key(&self) -> Option<&LocateKey> {
        self.key.as_ref()
    }
}

impl PartialEq for ActivationStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActivationStrategy {}

impl fmt::Display for ActivationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.implementation_type, self.export_as)?;
        if let Some(key) = &self.key {
            write!(f, " [{}]", key)?;
        }
        Ok(())
    }
}

/// Strategy producing a value that wraps another resolvable type.
///
/// Wrappers are usually registered under an open generic definition
/// (`Lazy<_>`), and unwrap a closed request (`Lazy<Db>`) to the type that
/// must itself be locatable (`Db`).
pub trait WrapperStrategy: Send + Sync + fmt::Debug {
    /// Type the wrapper is registered under.
    fn activation_type(&self) -> &TypeDescriptor;

    /// Type wrapped by `requested`.
    fn wrapped_type(&self, requested: &TypeDescriptor) -> TypeDescriptor;
}

impl Strategy for dyn WrapperStrategy {
    fn activation_type(&self) -> &TypeDescriptor {
        WrapperStrategy::activation_type(self)
    }
}

/// Wrapper unwrapping one generic argument of its definition.
///
/// A request that is not a closed form of `definition` unwraps to itself,
/// which the engine's cycle guard reports as an invalid configuration.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{GenericArgumentWrapper, WrapperStrategy, TypeDescriptor, well_known};
///
/// let wrapper = GenericArgumentWrapper::new(well_known::lazy(), 0);
/// let db = TypeDescriptor::class("app::Db");
/// let lazy_db = well_known::lazy().make_generic([db.clone()]).unwrap();
///
/// assert_eq!(wrapper.wrapped_type(&lazy_db), db);
/// ```
#[derive(Debug, Clone)]
pub struct GenericArgumentWrapper {
    definition: TypeDescriptor,
    argument_index: usize,
}

impl GenericArgumentWrapper {
    pub fn new(definition: TypeDescriptor, argument_index: usize) -> Self {
        Self { definition, argument_index }
    }
}

impl WrapperStrategy for GenericArgumentWrapper {
    fn activation_type(&self) -> &TypeDescriptor {
        &self.definition
    }

    fn wrapped_type(&self, requested: &TypeDescriptor) -> TypeDescriptor {
        if requested.generic_type_definition().as_ref() == Some(&self.definition) {
            if let Some(argument) = requested.generic_arguments().get(self.argument_index) {
                return argument.clone();
            }
        }
        requested.clone()
    }
}
