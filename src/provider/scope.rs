//! Injection scopes and the parent chain they delegate through.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::collection::{RegistrationCollection, StrategyCollectionContainer};
use crate::config::ScopeConfiguration;
use crate::descriptors::TypeDescriptor;
use crate::error::DiResult;
use crate::key::LocateKey;
use crate::observer::{LocateEvent, Observers};
use crate::registration::{ActivationStrategy, ActivationStrategyFilter, WrapperStrategy};

use super::locate::CanLocateTypeService;

/// Unique scope identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// Registries, configuration and collaborators owned by one scope.
pub(crate) struct ScopeParts {
    pub(crate) name: Arc<str>,
    pub(crate) parent: Option<Arc<InjectionScope>>,
    pub(crate) configuration: Arc<ScopeConfiguration>,
    pub(crate) strategies: Arc<StrategyCollectionContainer<ActivationStrategy>>,
    pub(crate) wrappers: Arc<StrategyCollectionContainer<dyn WrapperStrategy>>,
    pub(crate) locate_service: Arc<dyn CanLocateTypeService>,
    pub(crate) observers: Observers,
}

/// A node in the scope tree.
///
/// Each scope owns frozen registries for direct and wrapper strategies, a
/// configuration, and a link to its parent. Queries that find nothing
/// locally are delegated up the chain; the chain is never walked downward.
///
/// # Examples
///
/// ```
/// use ferrous_locate::{RegistrationCollection, TypeDescriptor};
///
/// let clock = TypeDescriptor::interface("app::Clock");
/// let session = TypeDescriptor::interface("app::Session");
///
/// let mut root_registrations = RegistrationCollection::new();
/// root_registrations.add_export(clock.clone());
/// let root = root_registrations.build();
///
/// let mut request_registrations = RegistrationCollection::new();
/// request_registrations.add_export(session.clone());
/// let request = root.create_child_scope(request_registrations);
///
/// // Children see their ancestors' registrations...
/// assert!(request.can_locate(&clock, None, None).unwrap());
/// // ...but parents never see their children's.
/// assert!(!root.can_locate(&session, None, None).unwrap());
/// ```
pub struct InjectionScope {
    id: ScopeId,
    name: Arc<str>,
    parent: Option<Arc<InjectionScope>>,
    configuration: Arc<ScopeConfiguration>,
    strategies: Arc<StrategyCollectionContainer<ActivationStrategy>>,
    wrappers: Arc<StrategyCollectionContainer<dyn WrapperStrategy>>,
    locate_service: Arc<dyn CanLocateTypeService>,
    observers: Observers,
}

impl InjectionScope {
    pub(crate) fn from_parts(parts: ScopeParts) -> Arc<Self> {
        Arc::new(Self {
            id: ScopeId::next(),
            name: parts.name,
            parent: parts.parent,
            configuration: parts.configuration,
            strategies: parts.strategies,
            wrappers: parts.wrappers,
            locate_service: parts.locate_service,
            observers: parts.observers,
        })
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<InjectionScope>> {
        self.parent.as_ref()
    }

    pub fn configuration(&self) -> &ScopeConfiguration {
        &self.configuration
    }

    /// Direct activation strategies, indexed by exported type.
    pub fn strategy_collection_container(&self) -> &StrategyCollectionContainer<ActivationStrategy> {
        &self.strategies
    }

    /// Wrapper strategies, indexed by the (usually open generic) type they wrap.
    pub fn wrapper_collection_container(&self) -> &StrategyCollectionContainer<dyn WrapperStrategy> {
        &self.wrappers
    }

    pub(crate) fn observers(&self) -> &Observers {
        &self.observers
    }

    pub(crate) fn locate_service(&self) -> &Arc<dyn CanLocateTypeService> {
        &self.locate_service
    }

    /// This scope followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Can a value of `ty` be produced by this scope or an ancestor?
    ///
    /// Absence is `Ok(false)`; errors signal malformed wrapper registrations.
    pub fn can_locate(
        &self,
        ty: &TypeDescriptor,
        filter: Option<&ActivationStrategyFilter>,
        key: Option<&LocateKey>,
    ) -> DiResult<bool> {
        self.can_locate_with(ty, filter, key, true)
    }

    /// [`can_locate`](Self::can_locate) with control over auto-registration of
    /// unregistered concrete types at this level.
    pub fn can_locate_with(
        &self,
        ty: &TypeDescriptor,
        filter: Option<&ActivationStrategyFilter>,
        key: Option<&LocateKey>,
        include_auto_register: bool,
    ) -> DiResult<bool> {
        if !self.observers.has_observers() {
            return self.locate_service.can_locate(self, ty, filter, key, include_auto_register);
        }

        let start = Instant::now();
        let found = self.locate_service.can_locate(self, ty, filter, key, include_auto_register)?;
        self.observers.located(&LocateEvent {
            scope_id: self.id,
            scope_name: &self.name,
            ty,
            key,
            found,
            duration: start.elapsed(),
        });
        Ok(found)
    }

    /// A sibling view of this scope under a different configuration.
    ///
    /// Registries, parent and collaborators are shared, not copied.
    pub fn with_configuration(&self, configuration: ScopeConfiguration) -> Arc<InjectionScope> {
        Self::from_parts(ScopeParts {
            name: self.name.clone(),
            parent: self.parent.clone(),
            configuration: Arc::new(configuration),
            strategies: self.strategies.clone(),
            wrappers: self.wrappers.clone(),
            locate_service: self.locate_service.clone(),
            observers: self.observers.clone(),
        })
    }

    /// Builds `registrations` into a child of this scope.
    pub fn create_child_scope(self: &Arc<Self>, registrations: RegistrationCollection) -> Arc<InjectionScope> {
        registrations.build_child(self)
    }
}

impl fmt::Debug for InjectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionScope")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.id))
            .field("configuration", &self.configuration)
            .field("strategies", &self.strategies)
            .field("wrappers", &self.wrappers)
            .finish()
    }
}

/// Iterator over a scope and its ancestors.
pub struct Ancestors<'a> {
    next: Option<&'a InjectionScope>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a InjectionScope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
