use ferrous_locate::{
    well_known, DiError, InjectionBehaviors, RegistrationCollection, ScopeConfiguration, ScopeSettings,
    TypeDescriptor,
};

#[test]
fn test_defaults() {
    let config = ScopeConfiguration::default();

    assert!(config.auto_register_unknown);
    assert_eq!(config.auto_register_exclusions, vec![well_known::string(), well_known::date_time()]);
    assert!(config.is_excluded_from_auto_register(&TypeDescriptor::primitive("f64")));
    assert!(!config.is_excluded_from_auto_register(&TypeDescriptor::class("app::Money")));

    let behaviors = &config.behaviors;
    assert!(behaviors.keyed_type_selector(&TypeDescriptor::primitive("u16")));
    assert!(behaviors.keyed_type_selector(&well_known::string()));
    assert!(behaviors.keyed_type_selector(&well_known::date_time()));
    assert!(!behaviors.keyed_type_selector(&TypeDescriptor::interface("app::Clock")));
}

#[test]
fn test_exclusions_are_not_duplicated() {
    let money = TypeDescriptor::class("app::Money");
    let config = ScopeConfiguration::default()
        .exclude_from_auto_register(money.clone())
        .exclude_from_auto_register(money.clone());

    assert_eq!(config.auto_register_exclusions.iter().filter(|ty| **ty == money).count(), 1);
}

#[test]
fn test_custom_keyed_type_selector() {
    let behaviors = InjectionBehaviors::default().with_keyed_type_selector(|_ty: &TypeDescriptor| false);
    assert!(!behaviors.keyed_type_selector(&TypeDescriptor::primitive("u16")));
}

#[test]
fn test_settings_from_env() {
    std::env::set_var("LOCATE_CONFIG_TEST_AUTO_REGISTER_UNKNOWN", "false");
    std::env::set_var("LOCATE_CONFIG_TEST_AUTO_REGISTER_EXCLUSIONS", "app::Money,app::Uuid");

    let settings = ScopeSettings::from_env("locate_config_test").unwrap();
    assert_eq!(settings.auto_register_unknown, Some(false));
    assert_eq!(settings.auto_register_exclusions, vec!["app::Money", "app::Uuid"]);

    let money = TypeDescriptor::class("app::Money");
    let mut registrations = RegistrationCollection::new();
    registrations.with_configuration(ScopeConfiguration::default().apply_settings(&settings));
    let scope = registrations.build();

    assert!(!scope.configuration().auto_register_unknown);
    assert!(scope.configuration().is_excluded_from_auto_register(&money));
    assert!(!scope.can_locate(&money, None, None).unwrap());
}

#[test]
fn test_settings_from_env_reject_bad_flag() {
    std::env::set_var("LOCATE_BAD_FLAG_AUTO_REGISTER_UNKNOWN", "sometimes");

    let err = ScopeSettings::from_env("LOCATE_BAD_FLAG").unwrap_err();
    assert!(matches!(err, DiError::Configuration(_)));
    assert!(err.to_string().starts_with("Configuration error:"));
}

#[test]
fn test_unset_env_gives_default_settings() {
    let settings = ScopeSettings::from_env("LOCATE_NOTHING_SET_HERE").unwrap();
    assert_eq!(settings, ScopeSettings::default());
}

#[cfg(feature = "config")]
#[test]
fn test_settings_from_json() {
    let settings = ScopeSettings::from_json(r#"{ "auto_register_unknown": true }"#).unwrap();
    assert_eq!(settings.auto_register_unknown, Some(true));
    assert!(settings.auto_register_exclusions.is_empty());

    let err = ScopeSettings::from_json(r#"{ "auto_register_unknown": "yes" }"#).unwrap_err();
    assert!(matches!(err, DiError::Configuration(_)));
}
