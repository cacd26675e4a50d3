//! # ferrous-locate
//!
//! Resolvability checks and member injection planning for a dependency
//! injection container.
//!
//! ## Features
//!
//! - **Locate without constructing**: ask whether a scope chain could produce
//!   a type, honoring keyed, wrapper, open generic, array and collection
//!   registrations plus auto-registration of concrete types
//! - **Scope trees**: children see their ancestors' registrations, never the
//!   other way round
//! - **Member injection plans**: extend a new-object plan with field and
//!   property bindings, with required/optional semantics and per-member keys
//! - **Cycle detection**: malformed wrapper registrations fail with the
//!   unwrap path instead of overflowing the stack
//! - **Validation**: report every member a scope cannot satisfy without
//!   building anything
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_locate::{RegistrationCollection, TypeDescriptor, TypeDefBuilder, well_known};
//!
//! let db = TypeDescriptor::interface("app::Db");
//! let handler = TypeDefBuilder::new("app::Handler").public_constructor().build();
//!
//! let mut registrations = RegistrationCollection::new();
//! registrations.add_export(db.clone()).add_standard_wrappers();
//! let root = registrations.build();
//!
//! // Registered
//! assert!(root.can_locate(&db, None, None).unwrap());
//! // Unwrapped through a registered wrapper
//! let lazy_db = well_known::lazy().make_generic([db]).unwrap();
//! assert!(root.can_locate(&lazy_db, None, None).unwrap());
//! // Auto-registered concrete type
//! assert!(root.can_locate(&handler, None, None).unwrap());
//! // Nothing can produce this
//! assert!(!root.can_locate(&TypeDescriptor::interface("app::Missing"), None, None).unwrap());
//! ```
//!
//! ## Scopes
//!
//! ```rust
//! use ferrous_locate::{RegistrationCollection, TypeDescriptor};
//!
//! let config = TypeDescriptor::interface("app::Config");
//! let user = TypeDescriptor::interface("app::CurrentUser");
//!
//! let mut root_registrations = RegistrationCollection::new();
//! root_registrations.add_export(config.clone());
//! let root = root_registrations.build();
//!
//! let mut request_registrations = RegistrationCollection::new();
//! request_registrations.with_name("request").add_export(user.clone());
//! let request = root.create_child_scope(request_registrations);
//!
//! assert!(request.can_locate(&config, None, None).unwrap());
//! assert!(!root.can_locate(&user, None, None).unwrap());
//! ```
//!
//! ## Member Injection
//!
//! The planner needs an [`ActivationExpressionBuilder`] that produces a
//! sub-plan for each member; here, one that emits a runtime locate node for
//! anything the scope can locate.
//!
//! ```rust
//! use std::sync::Arc;
//! use ferrous_locate::{
//!     ActivationExpressionBuilder, ActivationExpressionRequest, ActivationServices, ActivationStrategy,
//!     ConstructionPlan, DefaultMemberInjectionExpressionCreator, DiResult, InjectionScope,
//!     KnownMembersSelector, MemberDescriptor, MemberInjectionExpressionCreator, MemberInjectionInfo,
//!     PlanNode, RegistrationCollection, TypeActivationConfiguration, TypeDescriptor,
//! };
//!
//! struct LocateBuilder;
//!
//! impl ActivationExpressionBuilder for LocateBuilder {
//!     fn get_activation_expression(
//!         &self,
//!         scope: &InjectionScope,
//!         request: &ActivationExpressionRequest,
//!     ) -> DiResult<Option<ConstructionPlan>> {
//!         let ty = request.activation_type();
//!         Ok(scope
//!             .can_locate(ty, request.filter(), request.locate_key())?
//!             .then(|| ConstructionPlan::new(PlanNode::locate(ty.clone(), request.locate_key().cloned()))))
//!     }
//! }
//!
//! let report = TypeDescriptor::class("app::Report");
//! let clock = TypeDescriptor::interface("app::Clock");
//! let sink = TypeDescriptor::interface("app::Sink");
//!
//! let mut registrations = RegistrationCollection::new();
//! registrations.add_export(clock.clone());
//! let scope = registrations.build();
//!
//! let selector = KnownMembersSelector::new([
//!     MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), "clock", clock)),
//!     MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), "sink", sink)).required(false),
//! ]);
//! let configuration = TypeActivationConfiguration::new(Arc::new(ActivationStrategy::new(report.clone())))
//!     .with_selector(Arc::new(selector));
//!
//! let services = Arc::new(ActivationServices::new(Arc::new(LocateBuilder)));
//! let request = Arc::new(ActivationExpressionRequest::root(report.clone(), scope.clone(), services));
//!
//! let plan = DefaultMemberInjectionExpressionCreator::new().create_expression(
//!     &scope,
//!     &request,
//!     &configuration,
//!     ConstructionPlan::new(PlanNode::new_object(report, vec![])),
//! )?;
//!
//! // The optional sink could not be located and stays unbound
//! assert_eq!(plan.member_bindings().len(), 1);
//! assert_eq!(plan.member_bindings()[0].member.name(), "clock");
//! # Ok::<(), ferrous_locate::DiError>(())
//! ```

pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod expressions;
pub mod key;
pub mod observer;
pub mod plan;
pub mod provider;
pub mod registration;
pub mod validation;
pub mod well_known;

mod internal;

pub use collection::{ActivationStrategyCollection, RegistrationCollection, StrategyCollectionContainer};
pub use config::{InjectionBehaviors, KeyedTypeSelector, ScopeConfiguration, ScopeSettings};
pub use descriptors::{
    ConstructorInfo, MemberDescriptor, MemberKind, TypeDef, TypeDefBuilder, TypeDescriptor, TypeKind, Visibility,
};
pub use error::{DiError, DiResult};
pub use expressions::{
    ActivationExpressionBuilder, ActivationExpressionRequest, ActivationServices, ActivationStrategyDependency,
    DefaultMemberInjectionExpressionCreator, DefaultValueInformation, DependencyType, InjectionTargetInfo,
    KnownMembersSelector, MemberInjectionExpressionCreator, MemberInjectionInfo, MemberInjectionSelector,
    RequestType, StaticInjectionContext, TypeActivationConfiguration,
};
pub use key::LocateKey;
pub use observer::{DiObserver, LocateEvent, LoggingObserver};
pub use plan::{ConstructionPlan, MemberBinding, MemberInitBuilder, PlanNode, PlanValue, PlanVariable};
pub use provider::{Ancestors, CanLocateTypeService, DefaultCanLocateTypeService, InjectionScope, ScopeId};
pub use registration::{
    ActivationStrategy, ActivationStrategyFilter, GenericArgumentWrapper, Strategy, StrategyId, WrapperStrategy,
};
pub use validation::{ValidationBuilder, ValidationError, ValidationResult, ValidationWarning};
