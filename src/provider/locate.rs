//! The resolvability decision procedure.

use tracing::trace;

use crate::descriptors::TypeDescriptor;
use crate::error::DiResult;
use crate::internal::UnwrapGuard;
use crate::key::LocateKey;
use crate::registration::ActivationStrategyFilter;
use crate::well_known;

use super::scope::InjectionScope;

/// Service answering whether a type could be produced, without producing it.
///
/// Implementations must be pure queries over the scope's configuration and
/// registries (plus recursive parent queries). A scope holds one of these and
/// routes [`InjectionScope::can_locate`] through it.
pub trait CanLocateTypeService: Send + Sync {
    /// Can `ty` be located in `scope` (or an ancestor) under `key`?
    ///
    /// `include_auto_register` permits treating an unregistered concrete type
    /// as locatable at this level when the scope auto-registers unknowns.
    fn can_locate(
        &self,
        scope: &InjectionScope,
        ty: &TypeDescriptor,
        filter: Option<&ActivationStrategyFilter>,
        key: Option<&LocateKey>,
        include_auto_register: bool,
    ) -> DiResult<bool>;
}

/// The standard decision procedure.
///
/// Rules are checked in a fixed order and the first match wins:
///
/// 1. keyed lookups are exact: a keyed strategy for the type here, else the parent's answer
/// 2. any direct registration for the exact type
/// 3. any wrapper registration for the exact type
/// 4. arrays (an empty array always satisfies)
/// 5. closed generics: a registration for the open definition, a wrapper whose
///    unwrapped type is locatable, or an unknown-collection shape (answered by
///    the scope's auto-register flag)
/// 6. constructible concrete types: auto-registration, minus excluded types
/// 7. container-provided framework services
/// 8. the parent scope, unkeyed
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCanLocateTypeService;

impl DefaultCanLocateTypeService {
    pub fn new() -> Self {
        Self
    }
}

impl CanLocateTypeService for DefaultCanLocateTypeService {
    fn can_locate(
        &self,
        scope: &InjectionScope,
        ty: &TypeDescriptor,
        filter: Option<&ActivationStrategyFilter>,
        key: Option<&LocateKey>,
        include_auto_register: bool,
    ) -> DiResult<bool> {
        let strategies = scope.strategy_collection_container();
        let wrappers = scope.wrapper_collection_container();

        if let Some(key) = key {
            let keyed = strategies
                .get_activation_strategy_collection(ty)
                .and_then(|collection| collection.get_keyed_strategy(key))
                .is_some();
            if keyed {
                trace!(scope = scope.name(), %ty, %key, "keyed strategy");
                return Ok(true);
            }
            return match scope.parent() {
                Some(parent) => parent.can_locate(ty, filter, Some(key)),
                None => Ok(false),
            };
        }

        if strategies.get_activation_strategy_collection(ty).is_some() {
            trace!(scope = scope.name(), %ty, "direct registration");
            return Ok(true);
        }

        if wrappers.get_activation_strategy_collection(ty).is_some() {
            trace!(scope = scope.name(), %ty, "wrapper registration");
            return Ok(true);
        }

        if ty.is_array() {
            trace!(scope = scope.name(), %ty, "array");
            return Ok(true);
        }

        if let Some(generic) = ty.generic_type_definition().filter(|_| ty.is_constructed_generic()) {
            if strategies.get_activation_strategy_collection(&generic).is_some() {
                trace!(scope = scope.name(), %ty, %generic, "open generic registration");
                return Ok(true);
            }

            if let Some(collection) = wrappers.get_activation_strategy_collection(&generic) {
                let _guard = UnwrapGuard::enter(scope.id(), ty)?;
                for strategy in collection.get_strategies() {
                    let wrapped = strategy.wrapped_type(ty);
                    if self.can_locate(scope, &wrapped, filter, None, true)? {
                        trace!(scope = scope.name(), %ty, %wrapped, "wrapped type");
                        return Ok(true);
                    }
                }
            }

            if well_known::is_unknown_collection(&generic) {
                let auto_register = scope.configuration().auto_register_unknown;
                trace!(scope = scope.name(), %ty, auto_register, "unknown collection");
                return Ok(auto_register);
            }
        }

        if !ty.is_interface() && !ty.is_delegate() && ty.has_instantiable_constructor() {
            let configuration = scope.configuration();
            let auto_register = include_auto_register
                && configuration.auto_register_unknown
                && !configuration.is_excluded_from_auto_register(ty);
            trace!(scope = scope.name(), %ty, auto_register, "concrete type");
            return Ok(auto_register);
        }

        if well_known::is_framework_service(ty) {
            trace!(scope = scope.name(), %ty, "framework service");
            return Ok(true);
        }

        match scope.parent() {
            Some(parent) => parent.can_locate(ty, filter, None),
            None => Ok(false),
        }
    }
}
