//! Activation requests and the seam to the plan compiler.
//!
//! An [`ActivationExpressionRequest`] describes one thing the container has
//! been asked to produce: the type, who asked, for which member, and under
//! which key. Requests form a chain back to the root request, which is what
//! a [`StaticInjectionContext`] reports when resolution fails.
//!
//! Producing the actual sub-plan for a request is the job of an
//! [`ActivationExpressionBuilder`], supplied by the host through
//! [`ActivationServices`].

use std::fmt;
use std::sync::Arc;

use crate::descriptors::{MemberDescriptor, TypeDescriptor};
use crate::error::DiResult;
use crate::key::LocateKey;
use crate::plan::{ConstructionPlan, PlanValue};
use crate::provider::{InjectionScope, ScopeId};
use crate::registration::{ActivationStrategy, ActivationStrategyFilter};

pub mod member_injection;

pub use member_injection::{
    ActivationStrategyDependency, DefaultMemberInjectionExpressionCreator, DependencyType,
    KnownMembersSelector, MemberInjectionExpressionCreator, MemberInjectionInfo,
    MemberInjectionSelector, TypeActivationConfiguration,
};

/// Why a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// Top-level request from the host
    Root,
    ConstructorParameter,
    /// Field or property injection
    Member,
    MethodParameter,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestType::Root => "root",
            RequestType::ConstructorParameter => "constructor parameter",
            RequestType::Member => "member",
            RequestType::MethodParameter => "method parameter",
        };
        f.write_str(label)
    }
}

/// Fallback value declared for an injection target.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueInformation {
    pub default_value: PlanValue,
}

impl DefaultValueInformation {
    pub fn new(default_value: PlanValue) -> Self {
        Self { default_value }
    }
}

/// One link of a request chain, as captured for diagnostics.
#[derive(Debug, Clone)]
pub struct InjectionTargetInfo {
    /// Type the request asked for
    pub activation_type: TypeDescriptor,
    /// Type that owns the member or parameter being injected
    pub injected_type: Option<TypeDescriptor>,
    pub strategy: Option<Arc<ActivationStrategy>>,
    pub request_type: RequestType,
    pub member: Option<MemberDescriptor>,
    pub locate_key: Option<LocateKey>,
}

impl fmt::Display for InjectionTargetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.request_type, self.activation_type)?;
        if let Some(member) = &self.member {
            write!(f, " for {}", member)?;
        } else if let Some(owner) = &self.injected_type {
            write!(f, " for {}", owner)?;
        }
        if let Some(key) = &self.locate_key {
            write!(f, " with key {}", key)?;
        }
        Ok(())
    }
}

/// Everything known about a failed request without running any code.
///
/// Carries the requested type, the member and owning strategy that asked for
/// it, the scope the request ran in, and the full request chain, root first.
#[derive(Debug, Clone)]
pub struct StaticInjectionContext {
    pub scope_id: ScopeId,
    pub scope_name: Arc<str>,
    pub activation_type: TypeDescriptor,
    /// The failing link; `None` for a root request
    pub target: Option<InjectionTargetInfo>,
    pub chain: Vec<InjectionTargetInfo>,
}

impl fmt::Display for StaticInjectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not locate {}", self.activation_type)?;
        if let Some(target) = &self.target {
            if let Some(member) = &target.member {
                write!(f, " for member {}", member)?;
            }
            if let Some(key) = &target.locate_key {
                write!(f, " with key {}", key)?;
            }
            if let Some(strategy) = &target.strategy {
                write!(f, " (strategy {}: {})", strategy.id(), strategy)?;
            }
        }
        write!(f, " in scope '{}' ({})", self.scope_name, self.scope_id)?;
        for (depth, link) in self.chain.iter().enumerate() {
            write!(f, "\n  {}. {}", depth + 1, link)?;
        }
        Ok(())
    }
}

/// Produces sub-plans for requests.
///
/// Implemented by the plan compiler. Returning `Ok(None)` means "nothing can
/// produce this"; errors are reserved for genuine failures further down.
pub trait ActivationExpressionBuilder: Send + Sync {
    fn get_activation_expression(
        &self,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
    ) -> DiResult<Option<ConstructionPlan>>;
}

/// Collaborators shared by every request in a chain.
#[derive(Clone)]
pub struct ActivationServices {
    expression_builder: Arc<dyn ActivationExpressionBuilder>,
}

impl ActivationServices {
    pub fn new(expression_builder: Arc<dyn ActivationExpressionBuilder>) -> Self {
        Self { expression_builder }
    }

    pub fn expression_builder(&self) -> &dyn ActivationExpressionBuilder {
        self.expression_builder.as_ref()
    }
}

impl fmt::Debug for ActivationServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationServices")
            .field("expression_builder", &"<dyn ActivationExpressionBuilder>")
            .finish()
    }
}

/// A request to produce a value of some type.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use ferrous_locate::{
///     ActivationExpressionBuilder, ActivationExpressionRequest, ActivationServices,
///     ConstructionPlan, DiResult, InjectionScope, MemberDescriptor, RegistrationCollection,
///     RequestType, TypeDescriptor,
/// };
///
/// struct NothingBuilder;
///
/// impl ActivationExpressionBuilder for NothingBuilder {
///     fn get_activation_expression(
///         &self,
///         _scope: &InjectionScope,
///         _request: &ActivationExpressionRequest,
///     ) -> DiResult<Option<ConstructionPlan>> {
///         Ok(None)
///     }
/// }
///
/// let scope = RegistrationCollection::new().build();
/// let services = Arc::new(ActivationServices::new(Arc::new(NothingBuilder)));
///
/// let report = TypeDescriptor::class("app::Report");
/// let clock = TypeDescriptor::interface("app::Clock");
/// let root = Arc::new(ActivationExpressionRequest::root(report.clone(), scope, services));
///
/// let member = MemberDescriptor::property(report.clone(), "clock", clock.clone());
/// let child = root.new_request(clock.clone(), None, report, RequestType::Member, Some(member));
///
/// let context = child.static_injection_context();
/// assert_eq!(context.activation_type, clock);
/// assert_eq!(context.chain.len(), 2);
/// assert_eq!(context.chain[0].request_type, RequestType::Root);
/// ```
#[derive(Clone)]
pub struct ActivationExpressionRequest {
    activation_type: TypeDescriptor,
    requesting_scope: Arc<InjectionScope>,
    request_type: RequestType,
    requesting_strategy: Option<Arc<ActivationStrategy>>,
    injected_type: Option<TypeDescriptor>,
    info: Option<MemberDescriptor>,
    parent: Option<Arc<ActivationExpressionRequest>>,
    services: Arc<ActivationServices>,
    locate_key: Option<LocateKey>,
    is_dynamic: bool,
    is_required: bool,
    filter: Option<ActivationStrategyFilter>,
    default_value: Option<DefaultValueInformation>,
}

impl ActivationExpressionRequest {
    /// A top-level request. Root requests are required and carry no key.
    pub fn root(
        activation_type: TypeDescriptor,
        requesting_scope: Arc<InjectionScope>,
        services: Arc<ActivationServices>,
    ) -> Self {
        Self {
            activation_type,
            requesting_scope,
            request_type: RequestType::Root,
            requesting_strategy: None,
            injected_type: None,
            info: None,
            parent: None,
            services,
            locate_key: None,
            is_dynamic: false,
            is_required: true,
            filter: None,
            default_value: None,
        }
    }

    /// A child request issued while building `injected_type`.
    ///
    /// Scope and services are inherited; key, filter, and default value
    /// start empty and are set by the caller.
    pub fn new_request(
        self: &Arc<Self>,
        activation_type: TypeDescriptor,
        requesting_strategy: Option<Arc<ActivationStrategy>>,
        injected_type: TypeDescriptor,
        request_type: RequestType,
        info: Option<MemberDescriptor>,
    ) -> Self {
        Self {
            activation_type,
            requesting_scope: self.requesting_scope.clone(),
            request_type,
            requesting_strategy,
            injected_type: Some(injected_type),
            info,
            parent: Some(self.clone()),
            services: self.services.clone(),
            locate_key: None,
            is_dynamic: false,
            is_required: true,
            filter: None,
            default_value: None,
        }
    }

    pub fn activation_type(&self) -> &TypeDescriptor {
        &self.activation_type
    }

    pub fn requesting_scope(&self) -> &Arc<InjectionScope> {
        &self.requesting_scope
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn requesting_strategy(&self) -> Option<&Arc<ActivationStrategy>> {
        self.requesting_strategy.as_ref()
    }

    pub fn injected_type(&self) -> Option<&TypeDescriptor> {
        self.injected_type.as_ref()
    }

    /// Member this request injects, if any.
    pub fn info(&self) -> Option<&MemberDescriptor> {
        self.info.as_ref()
    }

    pub fn parent(&self) -> Option<&Arc<ActivationExpressionRequest>> {
        self.parent.as_ref()
    }

    pub fn services(&self) -> &ActivationServices {
        &self.services
    }

    pub fn locate_key(&self) -> Option<&LocateKey> {
        self.locate_key.as_ref()
    }

    pub fn set_locate_key(&mut self, key: Option<LocateKey>) {
        self.locate_key = key;
    }

    /// Re-resolved on every use instead of captured once.
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    pub fn set_is_dynamic(&mut self, dynamic: bool) {
        self.is_dynamic = dynamic;
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn set_is_required(&mut self, required: bool) {
        self.is_required = required;
    }

    pub fn filter(&self) -> Option<&ActivationStrategyFilter> {
        self.filter.as_ref()
    }

    pub fn set_filter(&mut self, filter: Option<ActivationStrategyFilter>) {
        self.filter = filter;
    }

    pub fn default_value(&self) -> Option<&DefaultValueInformation> {
        self.default_value.as_ref()
    }

    pub fn set_default_value(&mut self, default_value: Option<DefaultValueInformation>) {
        self.default_value = default_value;
    }

    fn target_info(&self) -> InjectionTargetInfo {
        InjectionTargetInfo {
            activation_type: self.activation_type.clone(),
            injected_type: self.injected_type.clone(),
            strategy: self.requesting_strategy.clone(),
            request_type: self.request_type,
            member: self.info.clone(),
            locate_key: self.locate_key.clone(),
        }
    }

    /// Snapshot of this request and its chain for error reporting.
    pub fn static_injection_context(&self) -> StaticInjectionContext {
        let mut chain = vec![self.target_info()];
        let mut current = self.parent.as_deref();
        while let Some(request) = current {
            chain.push(request.target_info());
            current = request.parent.as_deref();
        }
        chain.reverse();

        let target = match self.request_type {
            RequestType::Root => None,
            _ => Some(self.target_info()),
        };

        StaticInjectionContext {
            scope_id: self.requesting_scope.id(),
            scope_name: self.requesting_scope.name().into(),
            activation_type: self.activation_type.clone(),
            target,
            chain,
        }
    }
}

impl fmt::Debug for ActivationExpressionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationExpressionRequest")
            .field("activation_type", &self.activation_type)
            .field("scope", &self.requesting_scope.id())
            .field("request_type", &self.request_type)
            .field("member", &self.info)
            .field("locate_key", &self.locate_key)
            .field("is_dynamic", &self.is_dynamic)
            .field("is_required", &self.is_required)
            .field("has_filter", &self.filter.is_some())
            .field("default_value", &self.default_value)
            .finish()
    }
}
