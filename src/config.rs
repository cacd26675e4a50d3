//! Scope configuration and the settings that feed it.
//!
//! [`ScopeConfiguration`] is what the engine reads. [`ScopeSettings`] is its
//! plain-data counterpart, loadable from environment variables and, with the
//! `config` feature, from JSON.

use std::env;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::well_known;

/// Predicate deciding whether members of a type are located by member name.
pub type KeyedTypeSelector = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;

/// Pluggable per-scope behaviors.
#[derive(Clone)]
pub struct InjectionBehaviors {
    keyed_type_selector: KeyedTypeSelector,
}

impl InjectionBehaviors {
    /// True when a member of type `ty` should be located under its own name.
    pub fn keyed_type_selector(&self, ty: &TypeDescriptor) -> bool {
        (self.keyed_type_selector)(ty)
    }

    pub fn with_keyed_type_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        self.keyed_type_selector = Arc::new(selector);
        self
    }
}

impl Default for InjectionBehaviors {
    /// Keys primitives, strings and date/time members by name.
    fn default() -> Self {
        let string = well_known::string();
        let date_time = well_known::date_time();
        Self {
            keyed_type_selector: Arc::new(move |ty: &TypeDescriptor| {
                ty.is_primitive() || *ty == string || *ty == date_time
            }),
        }
    }
}

impl fmt::Debug for InjectionBehaviors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionBehaviors")
            .field("keyed_type_selector", &"<fn>")
            .finish()
    }
}

/// Per-scope settings consulted by the resolvability engine.
///
/// A scope's configuration is fixed once the scope is built; use
/// [`InjectionScope::with_configuration`] for a view with different settings.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{ScopeConfiguration, TypeDescriptor, well_known};
///
/// let config = ScopeConfiguration::default();
/// assert!(config.auto_register_unknown);
/// assert!(config.is_excluded_from_auto_register(&well_known::string()));
/// assert!(config.behaviors.keyed_type_selector(&TypeDescriptor::primitive("u16")));
///
/// let strict = ScopeConfiguration::default().auto_register_unknown(false);
/// assert!(!strict.auto_register_unknown);
/// ```
///
/// [`InjectionScope::with_configuration`]: crate::InjectionScope::with_configuration
#[derive(Debug, Clone)]
pub struct ScopeConfiguration {
    /// Treat unregistered concrete types and unknown collections as locatable
    pub auto_register_unknown: bool,
    pub behaviors: InjectionBehaviors,
    /// Concrete types never auto-registered, in addition to primitives
    pub auto_register_exclusions: Vec<TypeDescriptor>,
}

impl ScopeConfiguration {
    pub fn auto_register_unknown(mut self, enabled: bool) -> Self {
        self.auto_register_unknown = enabled;
        self
    }

    pub fn exclude_from_auto_register(mut self, ty: TypeDescriptor) -> Self {
        if !self.auto_register_exclusions.contains(&ty) {
            self.auto_register_exclusions.push(ty);
        }
        self
    }

    pub fn with_behaviors(mut self, behaviors: InjectionBehaviors) -> Self {
        self.behaviors = behaviors;
        self
    }

    pub fn is_excluded_from_auto_register(&self, ty: &TypeDescriptor) -> bool {
        ty.is_primitive() || self.auto_register_exclusions.contains(ty)
    }

    /// Applies `settings` on top of this configuration.
    pub fn apply_settings(mut self, settings: &ScopeSettings) -> Self {
        if let Some(enabled) = settings.auto_register_unknown {
            self.auto_register_unknown = enabled;
        }
        for name in &settings.auto_register_exclusions {
            self = self.exclude_from_auto_register(TypeDescriptor::class(name.as_str()));
        }
        self
    }
}

impl Default for ScopeConfiguration {
    fn default() -> Self {
        Self {
            auto_register_unknown: true,
            behaviors: InjectionBehaviors::default(),
            auto_register_exclusions: vec![well_known::string(), well_known::date_time()],
        }
    }
}

/// Plain-data scope settings.
///
/// Unset fields leave the configuration they are applied to untouched.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ScopeSettings {
    pub auto_register_unknown: Option<bool>,
    /// Type names added to the auto-register exclusion list
    pub auto_register_exclusions: Vec<String>,
}

impl ScopeSettings {
    /// Reads `{PREFIX}_AUTO_REGISTER_UNKNOWN` and the comma-separated
    /// `{PREFIX}_AUTO_REGISTER_EXCLUSIONS`.
    pub fn from_env(prefix: &str) -> DiResult<Self> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(prefix: &str, lookup: F) -> DiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", prefix.to_uppercase(), name));

        let auto_register_unknown = match var("AUTO_REGISTER_UNKNOWN") {
            Some(raw) => Some(parse_bool(&raw)?),
            None => None,
        };
        let auto_register_exclusions = var("AUTO_REGISTER_EXCLUSIONS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { auto_register_unknown, auto_register_exclusions })
    }

    /// Parses settings from a JSON object.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::Configuration(e.to_string()))
    }
}

fn parse_bool(raw: &str) -> DiResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DiError::Configuration(format!("expected a boolean, got '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn reads_prefixed_variables() {
        let settings = ScopeSettings::from_lookup(
            "app",
            lookup(&[
                ("APP_AUTO_REGISTER_UNKNOWN", "off"),
                ("APP_AUTO_REGISTER_EXCLUSIONS", "app::Money, app::Uuid,"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.auto_register_unknown, Some(false));
        assert_eq!(settings.auto_register_exclusions, vec!["app::Money", "app::Uuid"]);

        let config = ScopeConfiguration::default().apply_settings(&settings);
        assert!(!config.auto_register_unknown);
        assert!(config.is_excluded_from_auto_register(&TypeDescriptor::class("app::Money")));
        assert!(config.is_excluded_from_auto_register(&well_known::string()));
    }

    #[test]
    fn missing_variables_leave_defaults() {
        let settings = ScopeSettings::from_lookup("app", lookup(&[])).unwrap();
        assert_eq!(settings, ScopeSettings::default());
        let config = ScopeConfiguration::default().apply_settings(&settings);
        assert!(config.auto_register_unknown);
    }

    #[test]
    fn rejects_non_boolean_flag() {
        let err = ScopeSettings::from_lookup("app", lookup(&[("APP_AUTO_REGISTER_UNKNOWN", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, DiError::Configuration(_)));
    }

    #[cfg(feature = "config")]
    #[test]
    fn parses_json_settings() {
        let settings = ScopeSettings::from_json(
            r#"{ "auto_register_unknown": false, "auto_register_exclusions": ["app::Money"] }"#,
        )
        .unwrap();
        assert_eq!(settings.auto_register_unknown, Some(false));
        assert_eq!(settings.auto_register_exclusions, vec!["app::Money"]);

        assert!(ScopeSettings::from_json("[1, 2]").is_err());
    }
}
