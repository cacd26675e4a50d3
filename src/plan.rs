//! Construction plans.
//!
//! A [`ConstructionPlan`] describes how to produce a value without producing
//! it. The compiler that turns plans into running code lives elsewhere; this
//! module only defines the tree and the additive member-binding step.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::descriptors::{MemberDescriptor, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::LocateKey;

// Type-erased Arc for constants
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A literal value embedded in a plan.
///
/// Values compare by identity: two `PlanValue`s are equal when they share
/// the same allocation.
#[derive(Clone)]
pub struct PlanValue {
    value: AnyArc,
    type_name: &'static str,
}

impl PlanValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self { value, type_name: std::any::type_name::<T>() }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for PlanValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for PlanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlanValue<{}>", self.type_name)
    }
}

/// One node of a plan tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    /// Allocate `activation_type` through its constructor
    New {
        activation_type: TypeDescriptor,
        arguments: Vec<PlanNode>,
    },
    /// A literal value
    Constant(PlanValue),
    /// Delegate to the container at run time
    Locate {
        requested: TypeDescriptor,
        key: Option<LocateKey>,
    },
    /// An instance that already exists outside the plan
    Existing { description: Arc<str> },
    /// Construct, then assign members in order
    MemberInit {
        construction: Box<PlanNode>,
        bindings: Vec<MemberBinding>,
    },
}

impl PlanNode {
    pub fn new_object(activation_type: TypeDescriptor, arguments: Vec<PlanNode>) -> Self {
        PlanNode::New { activation_type, arguments }
    }

    pub fn constant<T: Any + Send + Sync>(value: T) -> Self {
        PlanNode::Constant(PlanValue::new(value))
    }

    pub fn locate(requested: TypeDescriptor, key: Option<LocateKey>) -> Self {
        PlanNode::Locate { requested, key }
    }

    /// Short name of this node's shape, for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            PlanNode::New { .. } => "new",
            PlanNode::Constant(_) => "constant",
            PlanNode::Locate { .. } => "locate",
            PlanNode::Existing { .. } => "existing-instance",
            PlanNode::MemberInit { .. } => "member-init",
        }
    }
}

/// Assignment of a member from a sub-plan.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBinding {
    pub member: MemberDescriptor,
    pub plan: PlanNode,
}

/// Local introduced by a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanVariable {
    pub name: Arc<str>,
    pub ty: TypeDescriptor,
}

impl PlanVariable {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self { name: name.into().into(), ty }
    }
}

/// A plan plus the side-effecting sub-results it pulled in.
///
/// `statements` and `variables` travel with the plan so whoever compiles it
/// still sees the work child plans needed, even after their roots have been
/// folded into a parent.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{ConstructionPlan, PlanNode, PlanVariable, TypeDescriptor};
///
/// let ty = TypeDescriptor::class("app::Report");
/// let plan = ConstructionPlan::new(PlanNode::new_object(ty.clone(), vec![]))
///     .with_variable(PlanVariable::new("report", ty));
///
/// assert_eq!(plan.root().shape_name(), "new");
/// assert_eq!(plan.variables().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionPlan {
    root: PlanNode,
    statements: Vec<PlanNode>,
    variables: Vec<PlanVariable>,
}

impl ConstructionPlan {
    pub fn new(root: PlanNode) -> Self {
        Self { root, statements: Vec::new(), variables: Vec::new() }
    }

    pub fn with_statement(mut self, statement: PlanNode) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn with_variable(mut self, variable: PlanVariable) -> Self {
        self.push_variable(variable);
        self
    }

    pub fn root(&self) -> &PlanNode {
        &self.root
    }

    pub fn statements(&self) -> &[PlanNode] {
        &self.statements
    }

    pub fn variables(&self) -> &[PlanVariable] {
        &self.variables
    }

    /// Member bindings of a `MemberInit` root; empty for other shapes.
    pub fn member_bindings(&self) -> &[MemberBinding] {
        match &self.root {
            PlanNode::MemberInit { bindings, .. } => bindings.as_slice(),
            _ => &[],
        }
    }

    /// Adopts `other`'s statements and variables.
    ///
    /// A variable already declared with the same name and type is kept once;
    /// same-named locals of different types are both kept.
    pub fn merge_results(&mut self, other: &ConstructionPlan) {
        self.statements.extend(other.statements.iter().cloned());
        for variable in &other.variables {
            self.push_variable(variable.clone());
        }
    }

    fn push_variable(&mut self, variable: PlanVariable) {
        if !self.variables.contains(&variable) {
            self.variables.push(variable);
        }
    }
}

/// Extends a new-object plan with member bindings.
///
/// The result is a fresh plan value; bindings are only ever added. With no
/// bindings, [`build`](Self::build) returns the input plan unchanged.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{ConstructionPlan, MemberDescriptor, MemberInitBuilder, PlanNode, TypeDescriptor};
///
/// let report = TypeDescriptor::class("app::Report");
/// let title = MemberDescriptor::field(report.clone(), "title", TypeDescriptor::class("alloc::string::String"));
///
/// let plan = ConstructionPlan::new(PlanNode::new_object(report, vec![]));
/// let mut builder = MemberInitBuilder::new(plan).unwrap();
/// builder.bind_node(title.clone(), PlanNode::constant("Quarterly".to_string()));
///
/// let plan = builder.build();
/// assert_eq!(plan.root().shape_name(), "member-init");
/// assert_eq!(plan.member_bindings()[0].member, title);
///
/// // Anything other than a new-object plan is rejected
/// let constant = ConstructionPlan::new(PlanNode::constant(1u8));
/// assert!(MemberInitBuilder::new(constant).is_err());
/// ```
#[derive(Debug)]
pub struct MemberInitBuilder {
    plan: ConstructionPlan,
    bindings: Vec<MemberBinding>,
}

impl MemberInitBuilder {
    /// Fails with [`DiError::UnsupportedPlanShape`] unless the root is `New`.
    pub fn new(plan: ConstructionPlan) -> DiResult<Self> {
        if matches!(plan.root, PlanNode::New { .. }) {
            Ok(Self { plan, bindings: Vec::new() })
        } else {
            Err(DiError::UnsupportedPlanShape(plan.root.shape_name()))
        }
    }

    /// Binds `member` to `sub_plan`'s root and adopts its sub-results.
    pub fn bind_plan(&mut self, member: MemberDescriptor, sub_plan: ConstructionPlan) -> &mut Self {
        self.plan.merge_results(&sub_plan);
        self.bind_node(member, sub_plan.root)
    }

    /// Binds `member` to a literal node.
    pub fn bind_node(&mut self, member: MemberDescriptor, node: PlanNode) -> &mut Self {
        self.bindings.push(MemberBinding { member, plan: node });
        self
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn build(self) -> ConstructionPlan {
        let Self { plan, bindings } = self;
        if bindings.is_empty() {
            return plan;
        }
        let ConstructionPlan { root, statements, variables } = plan;
        ConstructionPlan {
            root: PlanNode::MemberInit { construction: Box::new(root), bindings },
            statements,
            variables,
        }
    }
}
