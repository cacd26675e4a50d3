//! Error types for resolvability checks and injection planning.

use thiserror::Error;

use crate::expressions::StaticInjectionContext;

/// Dependency injection errors
///
/// Absence is never an error in this crate: [`can_locate`] answers `false`
/// and optional members are skipped. Errors are reserved for a required
/// member that cannot be produced, a plan shape member injection cannot
/// extend, and malformed registrations.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::DiError;
///
/// let shape = DiError::UnsupportedPlanShape("constant");
/// let cycle = DiError::InvalidWrapperConfiguration {
///     path: vec!["Lazy<Foo>".to_string(), "Lazy<Foo>".to_string()],
/// };
/// let depth = DiError::DepthExceeded(64);
///
/// assert_eq!(
///     cycle.to_string(),
///     "Invalid wrapper configuration: Lazy<Foo> -> Lazy<Foo>"
/// );
/// println!("Error: {}", shape);
/// println!("Error: {}", depth);
/// ```
///
/// [`can_locate`]: crate::InjectionScope::can_locate
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// A required dependency could not be located
    #[error("{0}")]
    Locate(Box<StaticInjectionContext>),
    /// Member injection was asked to extend a plan that does not construct a new object
    #[error("Member injection only supports new-object plans, found {0} plan")]
    UnsupportedPlanShape(&'static str),
    /// Wrapper unwrapping revisited a type it was already unwrapping (includes path)
    #[error("Invalid wrapper configuration: {}", .path.join(" -> "))]
    InvalidWrapperConfiguration {
        /// Types visited, ending with the repeated one
        path: Vec<String>,
    },
    /// Maximum unwrap depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A generic definition was closed over the wrong number of arguments
    #[error("Generic arity mismatch for {name}: expected {expected}, got {actual}")]
    GenericArity {
        /// Generic definition name
        name: String,
        /// Declared arity
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },
    /// Invalid scope settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DiError {
    /// Returns the static context of a location failure, if this is one.
    pub fn injection_context(&self) -> Option<&StaticInjectionContext> {
        match self {
            DiError::Locate(context) => Some(context),
            _ => None,
        }
    }
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;
