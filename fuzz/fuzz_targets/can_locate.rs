#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_locate::{
    well_known, ActivationStrategy, DiError, GenericArgumentWrapper, LocateKey, RegistrationCollection,
    TypeDescriptor,
};
use std::sync::Arc;

const NAMES: [&str; 4] = ["app::A", "app::B", "app::C", "app::D"];

// Builds a small descriptor from two bytes: shape and name
fn descriptor(shape: u8, name: u8) -> TypeDescriptor {
    let name = NAMES[(name % 4) as usize];
    match shape % 6 {
        0 => TypeDescriptor::class(name),
        1 => TypeDescriptor::interface(name),
        2 => TypeDescriptor::array(TypeDescriptor::class(name)),
        3 => well_known::vec()
            .make_generic([TypeDescriptor::interface(name)])
            .unwrap_or_else(|_| TypeDescriptor::interface(name)),
        4 => well_known::lazy()
            .make_generic([TypeDescriptor::interface(name)])
            .unwrap_or_else(|_| TypeDescriptor::interface(name)),
        _ => TypeDescriptor::primitive("u32"),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let auto_register = data[0] % 2 == 0;
    let self_wrapping = data[0] % 3 == 0;

    let mut root_registrations = RegistrationCollection::new();
    root_registrations
        .configure(|config| config.auto_register_unknown = auto_register)
        .add_standard_wrappers();
    if self_wrapping {
        // Unwraps Lazy<T> to Lazy<T>; must be reported, never overflow
        root_registrations.add_wrapper(Arc::new(GenericArgumentWrapper::new(well_known::lazy(), 7)));
    }

    let registrations = &data[1..data.len() / 2];
    for pair in registrations.chunks(2) {
        if let [shape, name] = pair {
            let ty = descriptor(*shape, *name);
            if shape % 2 == 0 {
                root_registrations.add_strategy(ActivationStrategy::new(ty).with_key(*name as i64));
            } else {
                root_registrations.add_export(ty);
            }
        }
    }
    let root = root_registrations.build();
    let child = root.create_child_scope(RegistrationCollection::new());

    for pair in data[data.len() / 2..].chunks(2) {
        if let [shape, name] = pair {
            let ty = descriptor(*shape, *name);
            let key: Option<LocateKey> = (shape % 3 == 0).then(|| (*name as i64).into());

            let from_child = child.can_locate(&ty, None, key.as_ref());
            let from_root = root.can_locate(&ty, None, key.as_ref());

            // Concrete types are answered by the child's own auto-register rule
            let delegated = key.is_some() || ty.is_array() || !ty.has_instantiable_constructor();

            match (&from_child, &from_root) {
                (Ok(child_found), Ok(root_found)) => {
                    if delegated {
                        assert!(*child_found || !*root_found);
                    }
                }
                (Err(DiError::InvalidWrapperConfiguration { .. }), _)
                | (_, Err(DiError::InvalidWrapperConfiguration { .. })) => assert!(self_wrapping),
                (Err(err), _) | (_, Err(err)) => panic!("unexpected error: {}", err),
            }
        }
    }
});
