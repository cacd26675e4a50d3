/// Property-based tests for the resolvability engine and member planning
///
/// These tests use proptest to generate random type names, keys and member
/// sets, and verify invariants that should hold for every scope.

mod common;

use common::{activation, new_object, root_request, LocatingBuilder};
use ferrous_locate::{
    well_known, DefaultMemberInjectionExpressionCreator, DiError, LocateKey, MemberDescriptor,
    MemberInjectionExpressionCreator, MemberInjectionInfo, RegistrationCollection, TypeDescriptor,
};
use proptest::prelude::*;
use std::sync::Arc;

fn type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}".prop_map(|name| format!("app::{}", name))
}

fn key() -> impl Strategy<Value = LocateKey> {
    prop_oneof![
        "[a-z_]{1,10}".prop_map(LocateKey::from),
        (0i64..64).prop_map(LocateKey::from),
    ]
}

// Property: A direct registration is located in its own scope, whatever the parent holds
proptest! {
    #[test]
    fn direct_registration_is_located(name in type_name(), as_interface in any::<bool>()) {
        let ty = if as_interface { TypeDescriptor::interface(name) } else { TypeDescriptor::class(name) };

        let parent = RegistrationCollection::new().build();
        let mut registrations = RegistrationCollection::new();
        registrations.configure(|c| c.auto_register_unknown = false).add_export(ty.clone());
        let child = parent.create_child_scope(registrations);

        prop_assert!(child.can_locate(&ty, None, None).unwrap());
    }
}

// Property: Keyed lookups hit their own key and defer every other key to the parent
proptest! {
    #[test]
    fn keyed_lookup_defers_other_keys(
        name in type_name(),
        own in key(),
        other in key(),
        parent_has_other in any::<bool>(),
    ) {
        prop_assume!(own != other);
        let ty = TypeDescriptor::interface(name);

        let mut root_registrations = RegistrationCollection::new();
        if parent_has_other {
            root_registrations.add_keyed_export(ty.clone(), other.clone());
        }
        let root = root_registrations.build();

        let mut registrations = RegistrationCollection::new();
        registrations.add_keyed_export(ty.clone(), own.clone());
        let scope = root.create_child_scope(registrations);

        prop_assert!(scope.can_locate(&ty, None, Some(&own)).unwrap());
        prop_assert_eq!(
            scope.can_locate(&ty, None, Some(&other)).unwrap(),
            root.can_locate(&ty, None, Some(&other)).unwrap()
        );
        prop_assert_eq!(scope.can_locate(&ty, None, Some(&other)).unwrap(), parent_has_other);
    }
}

// Property: Arrays of anything are locatable
proptest! {
    #[test]
    fn arrays_always_locate(name in type_name(), depth in 1usize..4, auto_register in any::<bool>()) {
        let mut ty = TypeDescriptor::interface(name);
        for _ in 0..depth {
            ty = TypeDescriptor::array(ty);
        }

        let mut registrations = RegistrationCollection::new();
        registrations.configure(|c| c.auto_register_unknown = auto_register);
        let scope = registrations.build();

        prop_assert!(scope.can_locate(&ty, None, None).unwrap());
    }
}

// Property: Unknown collections of anything follow the auto-register flag
proptest! {
    #[test]
    fn unknown_collections_follow_flag(
        name in type_name(),
        shape in 0usize..7,
        auto_register in any::<bool>(),
    ) {
        let collection = well_known::unknown_collections()[shape]
            .make_generic([TypeDescriptor::interface(name)])
            .unwrap();

        let mut registrations = RegistrationCollection::new();
        registrations.configure(|c| c.auto_register_unknown = auto_register);
        let scope = registrations.build();

        prop_assert_eq!(scope.can_locate(&collection, None, None).unwrap(), auto_register);
    }
}

// Property: Flipping auto-registration is a pure function of configuration
proptest! {
    #[test]
    fn auto_register_is_configuration_only(name in type_name()) {
        let ty = TypeDescriptor::class(name);

        let mut registrations = RegistrationCollection::new();
        registrations.configure(|c| c.auto_register_unknown = false);
        let strict = registrations.build();
        let relaxed = strict.with_configuration(strict.configuration().clone().auto_register_unknown(true));

        prop_assert!(!strict.can_locate(&ty, None, None).unwrap());
        prop_assert!(relaxed.can_locate(&ty, None, None).unwrap());
        prop_assert!(relaxed.can_locate(&ty, None, None).unwrap());
        prop_assert!(!strict.can_locate(&ty, None, None).unwrap());
    }
}

// Property: Root registrations are visible from children, child registrations never from the root
proptest! {
    #[test]
    fn delegation_is_one_way(root_name in type_name(), child_name in type_name()) {
        prop_assume!(root_name != child_name);
        let in_root = TypeDescriptor::interface(root_name);
        let in_child = TypeDescriptor::interface(child_name);

        let mut root_registrations = RegistrationCollection::new();
        root_registrations.add_export(in_root.clone());
        let root = root_registrations.build();

        let mut child_registrations = RegistrationCollection::new();
        child_registrations.add_export(in_child.clone());
        let child = root.create_child_scope(child_registrations);

        prop_assert!(child.can_locate(&in_root, None, None).unwrap());
        prop_assert!(!root.can_locate(&in_child, None, None).unwrap());
    }
}

// Property: An unresolvable member fails when required and disappears when optional
proptest! {
    #[test]
    fn optional_members_are_omitted(
        resolvable in prop::collection::btree_set("[a-z]{1,6}", 0..5),
        missing in "[A-Z]{1,6}",
    ) {
        let report = TypeDescriptor::class("app::Report");
        let clock = TypeDescriptor::interface("app::Clock");
        let absent = TypeDescriptor::interface(format!("app::{}Missing", missing));

        let mut registrations = RegistrationCollection::new();
        registrations.add_export(clock.clone());
        let scope = registrations.build();

        let present: Vec<_> = resolvable
            .iter()
            .map(|name| MemberInjectionInfo::new(MemberDescriptor::property(report.clone(), name.as_str(), clock.clone())))
            .collect();
        let absent_member = MemberDescriptor::property(report.clone(), "absent", absent);

        let creator = DefaultMemberInjectionExpressionCreator::new();
        let request = root_request(&scope, &report, Arc::new(LocatingBuilder::default()));
        let plan_with = |extra: Option<MemberInjectionInfo>| {
            let mut members = present.clone();
            members.extend(extra);
            creator.create_expression(&scope, &request, &activation(&report, members), new_object(&report))
        };

        let required = plan_with(Some(MemberInjectionInfo::new(absent_member.clone())));
        prop_assert!(matches!(required, Err(DiError::Locate(_))));

        let optional = plan_with(Some(MemberInjectionInfo::new(absent_member).required(false))).unwrap();
        let omitted = plan_with(None).unwrap();
        prop_assert_eq!(optional.member_bindings().len(), resolvable.len());
        prop_assert_eq!(optional, omitted);
    }
}

// Property: Dependency reports are repeatable
proptest! {
    #[test]
    fn dependencies_are_idempotent(
        members in prop::collection::btree_map("[a-z]{1,6}", any::<bool>(), 0..6),
    ) {
        let report = TypeDescriptor::class("app::Report");
        let clock = TypeDescriptor::interface("app::Clock");
        let sink = TypeDescriptor::interface("app::Sink");

        let mut registrations = RegistrationCollection::new();
        registrations.add_export(clock.clone());
        let scope = registrations.build();

        let infos: Vec<_> = members
            .iter()
            .map(|(name, registered)| {
                let ty = if *registered { clock.clone() } else { sink.clone() };
                MemberInjectionInfo::new(MemberDescriptor::field(report.clone(), name.as_str(), ty))
            })
            .collect();
        let configuration = activation(&report, infos);
        let request = root_request(&scope, &report, Arc::new(LocatingBuilder::default()));
        let creator = DefaultMemberInjectionExpressionCreator::new();

        let first = creator.get_dependencies(&configuration, &request);
        let second = creator.get_dependencies(&configuration, &request);

        prop_assert_eq!(&first, &second);
        for (dependency, (_, registered)) in first.iter().zip(members.iter()) {
            prop_assert_eq!(dependency.can_locate, *registered);
        }
    }
}
