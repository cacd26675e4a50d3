//! Shared fixtures for integration tests.
#![allow(dead_code)]

use ferrous_locate::{
    ActivationExpressionBuilder, ActivationExpressionRequest, ActivationServices, ActivationStrategy,
    ConstructionPlan, DefaultValueInformation, DiResult, InjectionScope, KnownMembersSelector, LocateKey,
    MemberInjectionInfo, PlanNode, PlanVariable, RequestType, TypeActivationConfiguration, TypeDescriptor,
};
use std::sync::{Arc, Mutex};

/// What the builder saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub ty: TypeDescriptor,
    pub request_type: RequestType,
    pub member: Option<String>,
    pub key: Option<LocateKey>,
    pub is_required: bool,
    pub is_dynamic: bool,
    pub has_filter: bool,
    pub default_value: Option<DefaultValueInformation>,
}

/// Produces a runtime-locate plan for anything the scope can locate.
///
/// Every plan carries a variable named after the located type so tests can
/// check that sub-results are merged into the parent plan.
#[derive(Default)]
pub struct LocatingBuilder {
    pub seen: Mutex<Vec<SeenRequest>>,
}

impl LocatingBuilder {
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl ActivationExpressionBuilder for LocatingBuilder {
    fn get_activation_expression(
        &self,
        scope: &InjectionScope,
        request: &ActivationExpressionRequest,
    ) -> DiResult<Option<ConstructionPlan>> {
        let ty = request.activation_type();
        self.seen.lock().unwrap().push(SeenRequest {
            ty: ty.clone(),
            request_type: request.request_type(),
            member: request.info().map(|member| member.name().to_string()),
            key: request.locate_key().cloned(),
            is_required: request.is_required(),
            is_dynamic: request.is_dynamic(),
            has_filter: request.filter().is_some(),
            default_value: request.default_value().cloned(),
        });

        if !scope.can_locate(ty, request.filter(), request.locate_key())? {
            return Ok(None);
        }
        let plan = ConstructionPlan::new(PlanNode::locate(ty.clone(), request.locate_key().cloned()))
            .with_variable(PlanVariable::new(format!("local_{}", ty), ty.clone()));
        Ok(Some(plan))
    }
}

pub fn root_request(
    scope: &Arc<InjectionScope>,
    ty: &TypeDescriptor,
    builder: Arc<dyn ActivationExpressionBuilder>,
) -> Arc<ActivationExpressionRequest> {
    let services = Arc::new(ActivationServices::new(builder));
    Arc::new(ActivationExpressionRequest::root(ty.clone(), scope.clone(), services))
}

pub fn activation(ty: &TypeDescriptor, members: Vec<MemberInjectionInfo>) -> TypeActivationConfiguration {
    TypeActivationConfiguration::new(Arc::new(ActivationStrategy::new(ty.clone())))
        .with_selector(Arc::new(KnownMembersSelector::new(members)))
}

pub fn new_object(ty: &TypeDescriptor) -> ConstructionPlan {
    ConstructionPlan::new(PlanNode::new_object(ty.clone(), vec![]))
}
