//! Diagnostic observers for locate decisions and member planning.
//!
//! Observers receive the decisions the engine makes so a host can trace
//! why a type was (or was not) considered locatable and which members a
//! plan bound or skipped.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::descriptors::{MemberDescriptor, TypeDescriptor};
use crate::expressions::StaticInjectionContext;
use crate::key::LocateKey;
use crate::provider::ScopeId;

/// One answered locate query.
#[derive(Debug, Clone, Copy)]
pub struct LocateEvent<'a> {
    pub scope_id: ScopeId,
    pub scope_name: &'a str,
    pub ty: &'a TypeDescriptor,
    pub key: Option<&'a LocateKey>,
    pub found: bool,
    /// Time spent answering, including parent delegation
    pub duration: Duration,
}

/// Observer trait for engine events.
///
/// Calls are made synchronously on the querying thread. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_locate::{DiObserver, LocateEvent, RegistrationCollection, TypeDescriptor};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Recorder {
///     misses: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn located(&self, event: &LocateEvent<'_>) {
///         if !event.found {
///             self.misses.lock().unwrap().push(event.ty.to_string());
///         }
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut registrations = RegistrationCollection::new();
/// registrations.add_observer(recorder.clone());
/// let scope = registrations.build();
///
/// scope.can_locate(&TypeDescriptor::interface("app::Missing"), None, None).unwrap();
/// assert_eq!(*recorder.misses.lock().unwrap(), vec!["app::Missing".to_string()]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called after a scope answers a locate query.
    fn located(&self, event: &LocateEvent<'_>);

    /// Called when a member binding is added to a plan.
    fn member_bound(&self, _member: &MemberDescriptor) {}

    /// Called when an optional member resolved to nothing and was left unbound.
    fn member_skipped(&self, _member: &MemberDescriptor) {}

    /// Called before a location failure is raised for a required member.
    fn location_failed(&self, _context: &StaticInjectionContext) {}
}

/// Container for registered observers.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn extend(&mut self, other: Observers) {
        self.observers.extend(other.observers);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn located(&self, event: &LocateEvent<'_>) {
        for observer in &self.observers {
            observer.located(event);
        }
    }

    #[inline]
    pub(crate) fn member_bound(&self, member: &MemberDescriptor) {
        for observer in &self.observers {
            observer.member_bound(member);
        }
    }

    #[inline]
    pub(crate) fn member_skipped(&self, member: &MemberDescriptor) {
        for observer in &self.observers {
            observer.member_skipped(member);
        }
    }

    #[inline]
    pub(crate) fn location_failed(&self, context: &StaticInjectionContext) {
        for observer in &self.observers {
            observer.location_failed(context);
        }
    }
}

/// Built-in observer forwarding events to `tracing`.
///
/// Locate answers go out at `debug`, failures at `warn`.
///
/// # Examples
///
/// ```
/// use ferrous_locate::{RegistrationCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut registrations = RegistrationCollection::new();
/// registrations.add_observer(Arc::new(LoggingObserver::new()));
///
/// // All locate decisions will be logged
/// let scope = registrations.build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self { prefix: "[ferrous-locate]".to_string() }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn located(&self, event: &LocateEvent<'_>) {
        debug!(
            scope = event.scope_name,
            scope_id = %event.scope_id,
            key = ?event.key,
            found = event.found,
            elapsed = ?event.duration,
            "{} Located {}", self.prefix, event.ty
        );
    }

    fn member_bound(&self, member: &MemberDescriptor) {
        debug!("{} Bound member {}", self.prefix, member);
    }

    fn member_skipped(&self, member: &MemberDescriptor) {
        debug!("{} Skipped optional member {}", self.prefix, member);
    }

    fn location_failed(&self, context: &StaticInjectionContext) {
        warn!("{} {}", self.prefix, context);
    }
}
