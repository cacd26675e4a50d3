//! Scope chain and the resolvability engine.
//!
//! [`InjectionScope`] is a node in the scope tree; [`CanLocateTypeService`]
//! is the decision procedure every scope routes its locate queries through.

pub mod locate;
pub mod scope;

pub use locate::{CanLocateTypeService, DefaultCanLocateTypeService};
pub use scope::{Ancestors, InjectionScope, ScopeId};
pub(crate) use scope::ScopeParts;
