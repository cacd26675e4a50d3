//! Container self-check without constructing anything.
//!
//! Validation runs the member injection planner's dependency report for each
//! registered activation and classifies the members the scope cannot locate.
//! Nothing is built and no scope is modified, so validation can run at
//! startup against the real scope tree.

use std::sync::Arc;

use thiserror::Error;

use crate::descriptors::{MemberDescriptor, TypeDescriptor};
use crate::expressions::{
    ActivationExpressionRequest, ActivationStrategyDependency, DefaultMemberInjectionExpressionCreator,
    MemberInjectionExpressionCreator, TypeActivationConfiguration,
};
use crate::registration::StrategyId;

/// Collects activations to validate against their scopes.
///
/// # Validation Rules
///
/// - **Required member not locatable**: Error, unless the member declares a default value
/// - **Optional member not locatable**: Warning, the member will be left unbound
/// - **Required member with default value not locatable**: Warning, the default is used
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ferrous_locate::{
///     ActivationExpressionBuilder, ActivationExpressionRequest, ActivationServices, ActivationStrategy,
///     ConstructionPlan, DefaultMemberInjectionExpressionCreator, DiResult, InjectionScope,
///     KnownMembersSelector, MemberDescriptor, MemberInjectionInfo, RegistrationCollection,
///     TypeActivationConfiguration, TypeDescriptor, ValidationBuilder,
/// };
///
/// struct NoPlans;
///
/// impl ActivationExpressionBuilder for NoPlans {
///     fn get_activation_expression(
///         &self,
///         _scope: &InjectionScope,
///         _request: &ActivationExpressionRequest,
///     ) -> DiResult<Option<ConstructionPlan>> {
///         Ok(None)
///     }
/// }
///
/// let report = TypeDescriptor::class("app::Report");
/// let clock = TypeDescriptor::interface("app::Clock");
/// let sink = TypeDescriptor::interface("app::Sink");
///
/// let mut registrations = RegistrationCollection::new();
/// registrations.add_export(clock.clone());
/// let scope = registrations.build();
///
/// let selector = KnownMembersSelector::new([
///     MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), "clock", clock)),
///     MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), "sink", sink)),
/// ]);
/// let configuration = TypeActivationConfiguration::new(Arc::new(ActivationStrategy::new(report.clone())))
///     .with_selector(Arc::new(selector));
///
/// let services = Arc::new(ActivationServices::new(Arc::new(NoPlans)));
/// let request = Arc::new(ActivationExpressionRequest::root(report, scope, services));
///
/// let result = ValidationBuilder::new(DefaultMemberInjectionExpressionCreator::new())
///     .add(configuration, request)
///     .validate();
///
/// assert!(!result.is_valid());
/// assert_eq!(result.errors.len(), 1);
/// ```
pub struct ValidationBuilder<C = DefaultMemberInjectionExpressionCreator> {
    creator: C,
    activations: Vec<(TypeActivationConfiguration, Arc<ActivationExpressionRequest>)>,
}

/// Result of validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Members that would make construction fail
    pub errors: Vec<ValidationError>,
    /// Members that would be left unbound or defaulted
    pub warnings: Vec<ValidationWarning>,
    /// Every dependency inspected, in activation then member order
    pub dependencies: Vec<ActivationStrategyDependency>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A validation error that would fail construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required member cannot be located
    #[error("{service} ({strategy}) requires {member} of type {dependency}, which cannot be located")]
    MissingDependency {
        strategy: StrategyId,
        service: TypeDescriptor,
        member: MemberDescriptor,
        dependency: TypeDescriptor,
    },
}

/// A validation warning about a member that will not be injected as declared.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Optional member cannot be located and will keep its default
    UnresolvedOptional {
        service: TypeDescriptor,
        member: MemberDescriptor,
        dependency: TypeDescriptor,
    },
    /// Required member cannot be located but declares a default value
    DefaultValueUsed {
        service: TypeDescriptor,
        member: MemberDescriptor,
    },
}

impl<C: MemberInjectionExpressionCreator> ValidationBuilder<C> {
    /// Creates a new validation builder over `creator`'s dependency report.
    pub fn new(creator: C) -> Self {
        Self { creator, activations: Vec::new() }
    }

    /// Adds one activation, checked against `request`'s scope.
    pub fn add(mut self, configuration: TypeActivationConfiguration, request: Arc<ActivationExpressionRequest>) -> Self {
        self.activations.push((configuration, request));
        self
    }

    /// Performs validation.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        for (configuration, request) in &self.activations {
            let service = &configuration.activation_type;

            for dependency in self.creator.get_dependencies(configuration, request) {
                if !dependency.can_locate {
                    if !dependency.is_required {
                        result.warnings.push(ValidationWarning::UnresolvedOptional {
                            service: service.clone(),
                            member: dependency.member.clone(),
                            dependency: dependency.ty.clone(),
                        });
                    } else if dependency.has_default_value {
                        result.warnings.push(ValidationWarning::DefaultValueUsed {
                            service: service.clone(),
                            member: dependency.member.clone(),
                        });
                    } else {
                        result.errors.push(ValidationError::MissingDependency {
                            strategy: dependency.strategy.id(),
                            service: service.clone(),
                            member: dependency.member.clone(),
                            dependency: dependency.ty.clone(),
                        });
                    }
                }
                result.dependencies.push(dependency);
            }
        }

        result
    }
}

impl Default for ValidationBuilder<DefaultMemberInjectionExpressionCreator> {
    fn default() -> Self {
        Self::new(DefaultMemberInjectionExpressionCreator::new())
    }
}
