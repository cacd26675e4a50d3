//! Registration collection module.
//!
//! This module contains the [`RegistrationCollection`] builder that gathers
//! strategies, wrappers, configuration and observers, and freezes them into
//! an [`InjectionScope`].

use std::sync::Arc;

use crate::config::ScopeConfiguration;
use crate::descriptors::TypeDescriptor;
use crate::key::LocateKey;
use crate::observer::{DiObserver, Observers};
use crate::provider::{CanLocateTypeService, DefaultCanLocateTypeService, InjectionScope, ScopeParts};
use crate::registration::{ActivationStrategy, GenericArgumentWrapper, WrapperStrategy};
use crate::well_known;

pub mod strategies;
pub use strategies::{ActivationStrategyCollection, StrategyCollectionContainer};

/// Builder for one scope's registrations.
///
/// Registries are mutable only while building; [`build`](Self::build) and
/// [`build_child`](Self::build_child) freeze them, so readers of a built
/// scope never observe a partial registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{RegistrationCollection, TypeDescriptor, well_known};
///
/// let db = TypeDescriptor::interface("app::Db");
/// let port = TypeDescriptor::primitive("u16");
///
/// let mut registrations = RegistrationCollection::new();
/// registrations
///     .with_name("root")
///     .add_export(db.clone())
///     .add_keyed_export(port.clone(), "http_port")
///     .add_standard_wrappers()
///     .configure(|config| config.auto_register_unknown = false);
///
/// let scope = registrations.build();
/// assert_eq!(scope.name(), "root");
/// assert!(scope.can_locate(&db, None, None).unwrap());
/// assert!(scope.can_locate(&port, None, Some(&"http_port".into())).unwrap());
///
/// let lazy_db = well_known::lazy().make_generic([db]).unwrap();
/// assert!(scope.can_locate(&lazy_db, None, None).unwrap());
/// ```
pub struct RegistrationCollection {
    name: Option<Arc<str>>,
    strategies: StrategyCollectionContainer<ActivationStrategy>,
    wrappers: StrategyCollectionContainer<dyn WrapperStrategy>,
    configuration: Option<ScopeConfiguration>,
    locate_service: Option<Arc<dyn CanLocateTypeService>>,
    observers: Observers,
}

impl RegistrationCollection {
    /// Creates a new empty registration collection.
    pub fn new() -> Self {
        Self {
            name: None,
            strategies: StrategyCollectionContainer::new(),
            wrappers: StrategyCollectionContainer::new(),
            configuration: None,
            locate_service: None,
            observers: Observers::new(),
        }
    }

    pub fn with_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into().into());
        self
    }

    /// Registers a strategy under its exported type (and key, if any).
    pub fn add_strategy(&mut self, strategy: ActivationStrategy) -> &mut Self {
        self.strategies.add_strategy(Arc::new(strategy));
        self
    }

    /// Registers `ty` as producing itself.
    pub fn add_export(&mut self, ty: TypeDescriptor) -> &mut Self {
        self.add_strategy(ActivationStrategy::new(ty))
    }

    /// Registers `ty` as producing itself under `key`.
    pub fn add_keyed_export(&mut self, ty: TypeDescriptor, key: impl Into<LocateKey>) -> &mut Self {
        self.add_strategy(ActivationStrategy::new(ty).with_key(key))
    }

    pub fn add_wrapper(&mut self, wrapper: Arc<dyn WrapperStrategy>) -> &mut Self {
        self.wrappers.add_strategy(wrapper);
        self
    }

    /// Registers the `Lazy<T>` and `Fn() -> T` unwrappers.
    pub fn add_standard_wrappers(&mut self) -> &mut Self {
        self.add_wrapper(Arc::new(GenericArgumentWrapper::new(well_known::lazy(), 0)))
            .add_wrapper(Arc::new(GenericArgumentWrapper::new(well_known::factory(), 0)))
    }

    /// Adds an observer; child scopes also report to their ancestors' observers.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Replaces the configuration. Without one, a root uses the default and a
    /// child inherits its parent's.
    pub fn with_configuration(&mut self, configuration: ScopeConfiguration) -> &mut Self {
        self.configuration = Some(configuration);
        self
    }

    /// Edits the configuration in place, starting from the default.
    pub fn configure<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut ScopeConfiguration),
    {
        configure(self.configuration.get_or_insert_with(ScopeConfiguration::default));
        self
    }

    /// Replaces the decision procedure. Children inherit their parent's.
    pub fn with_locate_service(&mut self, service: Arc<dyn CanLocateTypeService>) -> &mut Self {
        self.locate_service = Some(service);
        self
    }

    /// Freezes the registrations into a root scope.
    pub fn build(self) -> Arc<InjectionScope> {
        let name = self.name.unwrap_or_else(|| "root".into());
        InjectionScope::from_parts(ScopeParts {
            name,
            parent: None,
            configuration: Arc::new(self.configuration.unwrap_or_default()),
            strategies: Arc::new(self.strategies),
            wrappers: Arc::new(self.wrappers),
            locate_service: self
                .locate_service
                .unwrap_or_else(|| Arc::new(DefaultCanLocateTypeService::new())),
            observers: self.observers,
        })
    }

    /// Freezes the registrations into a child of `parent`.
    pub fn build_child(self, parent: &Arc<InjectionScope>) -> Arc<InjectionScope> {
        let name = self.name.unwrap_or_else(|| format!("{}/child", parent.name()).into());
        let configuration = match self.configuration {
            Some(configuration) => Arc::new(configuration),
            None => Arc::new(parent.configuration().clone()),
        };
        let mut observers = parent.observers().clone();
        observers.extend(self.observers);

        InjectionScope::from_parts(ScopeParts {
            name,
            parent: Some(parent.clone()),
            configuration,
            strategies: Arc::new(self.strategies),
            wrappers: Arc::new(self.wrappers),
            locate_service: self.locate_service.unwrap_or_else(|| parent.locate_service().clone()),
            observers,
        })
    }
}

impl Default for RegistrationCollection {
    fn default() -> Self {
        Self::new()
    }
}
