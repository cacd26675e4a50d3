//! Per-type strategy collections and the containers indexing them.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::descriptors::TypeDescriptor;
use crate::key::LocateKey;
use crate::registration::Strategy;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// All strategies registered for one exported type.
///
/// Unkeyed strategies keep registration order. Keyed strategies are unique
/// per key: registering a second strategy under an existing key replaces
/// the first.
pub struct ActivationStrategyCollection<S: ?Sized> {
    activation_type: TypeDescriptor,
    strategies: Vec<Arc<S>>,
    keyed: Map<LocateKey, Arc<S>>,
}

impl<S: ?Sized + Strategy> ActivationStrategyCollection<S> {
    pub(crate) fn new(activation_type: TypeDescriptor) -> Self {
        Self {
            activation_type,
            strategies: Vec::new(),
            keyed: Map::default(),
        }
    }

    /// Adds a strategy, returning the keyed strategy it replaced.
    pub(crate) fn add(&mut self, strategy: Arc<S>) -> Option<Arc<S>> {
        match strategy.locate_key().cloned() {
            Some(key) => {
                let replaced = self.keyed.insert(key.clone(), strategy);
                if replaced.is_some() {
                    debug!(ty = %self.activation_type, key = %key, "replaced keyed strategy");
                }
                replaced
            }
            None => {
                self.strategies.push(strategy);
                None
            }
        }
    }

    pub fn activation_type(&self) -> &TypeDescriptor {
        &self.activation_type
    }

    /// Strategy registered under `key`, if any.
    pub fn get_keyed_strategy(&self, key: &LocateKey) -> Option<Arc<S>> {
        self.keyed.get(key).cloned()
    }

    /// Unkeyed strategies in registration order.
    pub fn get_strategies(&self) -> &[Arc<S>] {
        &self.strategies
    }

    pub fn keys(&self) -> impl Iterator<Item = &LocateKey> {
        self.keyed.keys()
    }

    pub fn len(&self) -> usize {
        self.strategies.len() + self.keyed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: ?Sized> fmt::Debug for ActivationStrategyCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationStrategyCollection")
            .field("activation_type", &self.activation_type.to_string())
            .field("strategies", &self.strategies.len())
            .field("keyed", &self.keyed.len())
            .finish()
    }
}

/// Index from exported type to its strategy collection.
///
/// A container is frozen once its scope is built; lookups never allocate.
pub struct StrategyCollectionContainer<S: ?Sized> {
    collections: Map<TypeDescriptor, ActivationStrategyCollection<S>>,
}

impl<S: ?Sized + Strategy> StrategyCollectionContainer<S> {
    pub(crate) fn new() -> Self {
        Self { collections: Map::default() }
    }

    pub(crate) fn add_strategy(&mut self, strategy: Arc<S>) {
        let ty = strategy.activation_type().clone();
        self.collections
            .entry(ty.clone())
            .or_insert_with(|| ActivationStrategyCollection::new(ty))
            .add(strategy);
    }

    /// Collection for exactly `ty`; `None` when nothing is registered for it.
    pub fn get_activation_strategy_collection(
        &self,
        ty: &TypeDescriptor,
    ) -> Option<&ActivationStrategyCollection<S>> {
        self.collections.get(ty).filter(|collection| !collection.is_empty())
    }

    /// Exported types with at least one registration.
    pub fn activation_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.collections.keys()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl<S: ?Sized> fmt::Debug for StrategyCollectionContainer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyCollectionContainer")
            .field("types", &self.collections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::ActivationStrategy;

    #[test]
    fn keyed_registration_replaces_same_key() {
        let ty = TypeDescriptor::class("app::Cache");
        let mut container = StrategyCollectionContainer::new();
        let first = Arc::new(ActivationStrategy::new(ty.clone()).with_key("a"));
        let second = Arc::new(ActivationStrategy::new(ty.clone()).with_key("a"));
        container.add_strategy(first);
        container.add_strategy(second.clone());

        let collection = container.get_activation_strategy_collection(&ty).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get_keyed_strategy(&"a".into()), Some(second));
        assert!(collection.get_strategies().is_empty());
    }

    #[test]
    fn unkeyed_registrations_accumulate_in_order() {
        let ty = TypeDescriptor::class("app::Handler");
        let mut container = StrategyCollectionContainer::new();
        let first = Arc::new(ActivationStrategy::new(ty.clone()));
        let second = Arc::new(ActivationStrategy::new(ty.clone()));
        container.add_strategy(first.clone());
        container.add_strategy(second.clone());

        let collection = container.get_activation_strategy_collection(&ty).unwrap();
        assert_eq!(collection.get_strategies(), &[first, second]);
    }

    #[test]
    fn missing_type_has_no_collection() {
        let container = StrategyCollectionContainer::<ActivationStrategy>::new();
        assert!(container
            .get_activation_strategy_collection(&TypeDescriptor::class("app::Missing"))
            .is_none());
        assert!(container.is_empty());
    }
}
