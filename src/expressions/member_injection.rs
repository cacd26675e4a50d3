//! Field and property injection planning.
//!
//! Given a plan that constructs a fresh object, the planner asks every
//! member selector which members to inject, resolves a sub-plan for each
//! one, and returns the plan extended with member bindings. The same member
//! list also drives [`get_dependencies`], a side-effect-free report of which
//! members the scope could satisfy.
//!
//! [`get_dependencies`]: MemberInjectionExpressionCreator::get_dependencies

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::collection::strategies::Map;
use crate::descriptors::{MemberDescriptor, MemberKind, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::LocateKey;
use crate::plan::{ConstructionPlan, MemberInitBuilder, PlanNode, PlanValue};
use crate::provider::InjectionScope;
use crate::registration::{ActivationStrategy, ActivationStrategyFilter};

use super::{ActivationExpressionRequest, DefaultValueInformation, RequestType};

/// How one member should be injected.
///
/// Members are required unless marked otherwise.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{MemberDescriptor, MemberInjectionInfo, PlanNode, TypeDescriptor};
///
/// let service = TypeDescriptor::class("app::Mailer");
/// let retries = MemberDescriptor::property(service.clone(), "retries", TypeDescriptor::primitive("u32"));
///
/// let info = MemberInjectionInfo::new(retries)
///     .required(false)
///     .with_default_value(3u32);
/// assert!(!info.is_required());
/// assert_eq!(info.default_value().and_then(|v| v.downcast_ref::<u32>()), Some(&3));
///
/// let host = MemberDescriptor::field(service, "host", TypeDescriptor::class("alloc::string::String"));
/// let preset = MemberInjectionInfo::new(host).with_expression(PlanNode::constant("smtp.local".to_string()));
/// assert!(preset.create_expression().is_some());
/// ```
#[derive(Clone)]
pub struct MemberInjectionInfo {
    member: MemberDescriptor,
    is_required: bool,
    is_dynamic: bool,
    locate_key: Option<LocateKey>,
    filter: Option<ActivationStrategyFilter>,
    default_value: Option<PlanValue>,
    create_expression: Option<PlanNode>,
}

impl MemberInjectionInfo {
    pub fn new(member: MemberDescriptor) -> Self {
        Self {
            member,
            is_required: true,
            is_dynamic: false,
            locate_key: None,
            filter: None,
            default_value: None,
            create_expression: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.is_dynamic = dynamic;
        self
    }

    /// Locate under `key`, overriding any key derived from the member name.
    pub fn with_locate_key(mut self, key: impl Into<LocateKey>) -> Self {
        self.locate_key = Some(key.into());
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&ActivationStrategy) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn with_default_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default_value = Some(PlanValue::new(value));
        self
    }

    /// Bind this node directly instead of resolving the member's type.
    pub fn with_expression(mut self, node: PlanNode) -> Self {
        self.create_expression = Some(node);
        self
    }

    pub fn member(&self) -> &MemberDescriptor {
        &self.member
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    pub fn locate_key(&self) -> Option<&LocateKey> {
        self.locate_key.as_ref()
    }

    pub fn filter(&self) -> Option<&ActivationStrategyFilter> {
        self.filter.as_ref()
    }

    pub fn default_value(&self) -> Option<&PlanValue> {
        self.default_value.as_ref()
    }

    pub fn create_expression(&self) -> Option<&PlanNode> {
        self.create_expression.as_ref()
    }
}

impl fmt::Debug for MemberInjectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInjectionInfo")
            .field("member", &self.member)
            .field("is_required", &self.is_required)
            .field("is_dynamic", &self.is_dynamic)
            .field("locate_key", &self.locate_key)
            .field("has_filter", &self.filter.is_some())
            .field("default_value", &self.default_value)
            .field("create_expression", &self.create_expression)
            .finish()
    }
}

/// Source of members to inject for a type.
///
/// Closures with the matching signature are selectors.
pub trait MemberInjectionSelector: Send + Sync {
    fn properties_and_fields(
        &self,
        ty: &TypeDescriptor,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
    ) -> Vec<MemberInjectionInfo>;
}

impl<F> MemberInjectionSelector for F
where
    F: Fn(&TypeDescriptor, &InjectionScope, &ActivationExpressionRequest) -> Vec<MemberInjectionInfo> + Send + Sync,
{
    fn properties_and_fields(
        &self,
        ty: &TypeDescriptor,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
    ) -> Vec<MemberInjectionInfo> {
        self(ty, scope, request)
    }
}

/// Selector over a fixed member list.
///
/// Only members declared on the activated type are returned.
#[derive(Debug, Clone, Default)]
pub struct KnownMembersSelector {
    members: Vec<MemberInjectionInfo>,
}

impl KnownMembersSelector {
    pub fn new(members: impl IntoIterator<Item = MemberInjectionInfo>) -> Self {
        Self { members: members.into_iter().collect() }
    }

    pub fn member(mut self, info: MemberInjectionInfo) -> Self {
        self.members.push(info);
        self
    }
}

impl MemberInjectionSelector for KnownMembersSelector {
    fn properties_and_fields(
        &self,
        ty: &TypeDescriptor,
        _scope: &InjectionScope,
        _request: &ActivationExpressionRequest,
    ) -> Vec<MemberInjectionInfo> {
        self.members
            .iter()
            .filter(|info| info.member().declaring_type() == ty)
            .cloned()
            .collect()
    }
}

/// What the planner needs to know about one strategy's activation.
#[derive(Clone)]
pub struct TypeActivationConfiguration {
    pub activation_strategy: Arc<ActivationStrategy>,
    pub activation_type: TypeDescriptor,
    pub member_injection_selectors: Vec<Arc<dyn MemberInjectionSelector>>,
}

impl TypeActivationConfiguration {
    /// Activates the strategy's implementation type with no selectors.
    pub fn new(activation_strategy: Arc<ActivationStrategy>) -> Self {
        let activation_type = activation_strategy.implementation_type().clone();
        Self { activation_strategy, activation_type, member_injection_selectors: Vec::new() }
    }

    pub fn with_selector(mut self, selector: Arc<dyn MemberInjectionSelector>) -> Self {
        self.member_injection_selectors.push(selector);
        self
    }
}

impl fmt::Debug for TypeActivationConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeActivationConfiguration")
            .field("activation_strategy", &self.activation_strategy)
            .field("activation_type", &self.activation_type)
            .field("selectors", &self.member_injection_selectors.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyType {
    ConstructorParameter,
    Property,
    Field,
}

impl From<MemberKind> for DependencyType {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Property => DependencyType::Property,
            MemberKind::Field => DependencyType::Field,
        }
    }
}

/// One dependency edge of a strategy, with whether the scope could satisfy it.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationStrategyDependency {
    pub dependency_type: DependencyType,
    pub strategy: Arc<ActivationStrategy>,
    pub member: MemberDescriptor,
    pub ty: TypeDescriptor,
    pub name: Arc<str>,
    pub has_default_value: bool,
    pub is_required: bool,
    /// Outcome of the locate check when the list was computed
    pub can_locate: bool,
}

/// Plans member injection for new-object plans.
pub trait MemberInjectionExpressionCreator: Send + Sync {
    /// Reports every injectable member and whether it can be located.
    ///
    /// Never fails; "cannot locate" is reported in the records.
    fn get_dependencies(
        &self,
        configuration: &TypeActivationConfiguration,
        request: &ActivationExpressionRequest,
    ) -> Vec<ActivationStrategyDependency>;

    /// Extends `plan` with member bindings.
    ///
    /// # Errors
    ///
    /// - [`DiError::UnsupportedPlanShape`] when `plan` does not construct a new object
    /// - [`DiError::Locate`] when a required member has no plan
    fn create_expression(
        &self,
        scope: &InjectionScope,
        request: &Arc<ActivationExpressionRequest>,
        configuration: &TypeActivationConfiguration,
        plan: ConstructionPlan,
    ) -> DiResult<ConstructionPlan>;
}

/// The standard member injection planner.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMemberInjectionExpressionCreator;

impl DefaultMemberInjectionExpressionCreator {
    pub fn new() -> Self {
        Self
    }

    /// Merges every selector's members.
    ///
    /// A member keeps the position it was first seen at; a later selector
    /// reporting the same member replaces its info.
    fn member_injection_info(
        &self,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
        configuration: &TypeActivationConfiguration,
    ) -> Vec<MemberInjectionInfo> {
        let mut members: Vec<MemberInjectionInfo> = Vec::new();
        let mut positions: Map<MemberDescriptor, usize> = Map::default();

        for selector in &configuration.member_injection_selectors {
            for info in selector.properties_and_fields(&configuration.activation_type, scope, request) {
                match positions.get(info.member()) {
                    Some(&index) => members[index] = info,
                    None => {
                        positions.insert(info.member().clone(), members.len());
                        members.push(info);
                    }
                }
            }
        }

        members
    }

    /// An explicit key on the info, else the member name for keyed types.
    fn locate_key_for(scope: &InjectionScope, info: &MemberInjectionInfo) -> Option<LocateKey> {
        if let Some(key) = info.locate_key() {
            return Some(key.clone());
        }
        let member = info.member();
        if scope.configuration().behaviors.keyed_type_selector(member.member_type()) {
            Some(LocateKey::Name(member.name_arc()))
        } else {
            None
        }
    }
}

impl MemberInjectionExpressionCreator for DefaultMemberInjectionExpressionCreator {
    fn get_dependencies(
        &self,
        configuration: &TypeActivationConfiguration,
        request: &ActivationExpressionRequest,
    ) -> Vec<ActivationStrategyDependency> {
        let scope = request.requesting_scope();

        self.member_injection_info(scope, request, configuration)
            .into_iter()
            .map(|info| {
                let member = info.member();
                let member_type = member.member_type();
                let key = Self::locate_key_for(scope, &info);

                // Generic parameters are checked where the type is closed
                let can_locate = member_type.is_generic_parameter()
                    || scope.can_locate(member_type, None, key.as_ref()).unwrap_or_else(|err| {
                        warn!(member = %member, error = %err, "treating member as not locatable");
                        false
                    });

                ActivationStrategyDependency {
                    dependency_type: member.kind().into(),
                    strategy: configuration.activation_strategy.clone(),
                    member: member.clone(),
                    ty: member_type.clone(),
                    name: member.name_arc(),
                    has_default_value: info.default_value().is_some(),
                    is_required: info.is_required(),
                    can_locate,
                }
            })
            .collect()
    }

    fn create_expression(
        &self,
        scope: &InjectionScope,
        request: &Arc<ActivationExpressionRequest>,
        configuration: &TypeActivationConfiguration,
        plan: ConstructionPlan,
    ) -> DiResult<ConstructionPlan> {
        let mut builder = MemberInitBuilder::new(plan)?;
        let observers = scope.observers();

        for info in self.member_injection_info(scope, request, configuration) {
            let member = info.member().clone();

            if let Some(node) = info.create_expression() {
                debug!(member = %member, "binding preset expression");
                observers.member_bound(&member);
                builder.bind_node(member, node.clone());
                continue;
            }

            let member_type = member.member_type().clone();
            let mut member_request = request.new_request(
                member_type,
                Some(configuration.activation_strategy.clone()),
                configuration.activation_type.clone(),
                RequestType::Member,
                Some(member.clone()),
            );
            member_request.set_locate_key(Self::locate_key_for(scope, &info));
            member_request.set_is_dynamic(info.is_dynamic());
            member_request.set_is_required(info.is_required());
            member_request.set_filter(info.filter().cloned());
            if let Some(value) = info.default_value() {
                member_request.set_default_value(Some(DefaultValueInformation::new(value.clone())));
            }

            let member_plan = request
                .services()
                .expression_builder()
                .get_activation_expression(scope, &member_request)?;

            match member_plan {
                Some(sub_plan) => {
                    debug!(member = %member, shape = sub_plan.root().shape_name(), "binding member");
                    observers.member_bound(&member);
                    builder.bind_plan(member, sub_plan);
                }
                None if info.is_required() => {
                    let context = member_request.static_injection_context();
                    observers.location_failed(&context);
                    return Err(DiError::Locate(Box::new(context)));
                }
                None => {
                    debug!(member = %member, "optional member not located, leaving unbound");
                    observers.member_skipped(&member);
                }
            }
        }

        debug!(ty = %configuration.activation_type, bindings = builder.binding_count(), "member injection planned");
        Ok(builder.build())
    }
}
