//! Fixed type sets the resolvability engine consults.
//!
//! These descriptors are process-wide: registrations and requests compare
//! against them by `(name, arity)`, so a descriptor built elsewhere with the
//! same name is the same type.

use once_cell::sync::Lazy;

use crate::descriptors::{TypeDefBuilder, TypeDescriptor, TypeKind};

macro_rules! well_known {
    ($($(#[$meta:meta])* $fn_name:ident => $init:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $fn_name() -> TypeDescriptor {
                static CELL: Lazy<TypeDescriptor> = Lazy::new(|| $init);
                CELL.clone()
            }
        )*
    };
}

well_known! {
    /// Text string type
    string => TypeDescriptor::class("alloc::string::String");
    /// Wall-clock date/time type
    date_time => TypeDescriptor::class("std::time::SystemTime");

    /// Ordered sequence (`IntoIterator<Item = T>`)
    sequence => TypeDescriptor::generic_interface("core::iter::IntoIterator", 1);
    /// Growable list
    vec => TypeDescriptor::generic_class("alloc::vec::Vec", 1);
    /// Double-ended list
    vec_deque => TypeDescriptor::generic_class("alloc::collections::VecDeque", 1);
    /// Read-only list
    boxed_slice => TypeDescriptor::generic_class("alloc::boxed::Box<[]>", 1);
    /// Immutable shared list
    shared_slice => TypeDescriptor::generic_class("alloc::sync::Arc<[]>", 1);
    /// Hashed set
    hash_set => TypeDescriptor::generic_class("std::collections::HashSet", 1);
    /// Ordered set
    btree_set => TypeDescriptor::generic_class("alloc::collections::BTreeSet", 1);

    /// Deferred value, unwrapped to its argument
    lazy => TypeDescriptor::generic_class("once_cell::sync::Lazy", 1);
    /// Factory delegate `Fn() -> T`, unwrapped to its argument
    factory => TypeDefBuilder::new("core::ops::Fn")
        .kind(TypeKind::Delegate)
        .arity(1)
        .public_constructor()
        .build();

    /// Service locator handed to factories
    locator_service => TypeDescriptor::interface("ferrous_locate::LocatorService");
    /// The requesting scope itself
    export_locator_scope => TypeDescriptor::interface("ferrous_locate::ExportLocatorScope");
    /// Per-resolution context bag
    injection_context => TypeDescriptor::interface("ferrous_locate::InjectionContext");
    /// Static description of the current injection site
    static_injection_context => TypeDefBuilder::new("ferrous_locate::StaticInjectionContext").build();
}

/// Primitive descriptor for a Rust scalar name such as `"u32"`.
///
/// Returns `None` for names that are not scalars.
pub fn primitive(name: &str) -> Option<TypeDescriptor> {
    const SCALARS: [&str; 16] = [
        "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize",
        "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64",
    ];
    if SCALARS.contains(&name) {
        Some(TypeDescriptor::primitive(name))
    } else {
        None
    }
}

/// Collection definitions that count as satisfiable exactly when the scope
/// auto-registers unknown element types.
pub fn unknown_collections() -> [TypeDescriptor; 7] {
    [sequence(), vec(), vec_deque(), boxed_slice(), shared_slice(), hash_set(), btree_set()]
}

/// True for an open definition in [`unknown_collections`].
pub fn is_unknown_collection(definition: &TypeDescriptor) -> bool {
    unknown_collections().iter().any(|candidate| candidate == definition)
}

/// Container-provided service types that always resolve.
pub fn framework_services() -> [TypeDescriptor; 4] {
    [locator_service(), export_locator_scope(), injection_context(), static_injection_context()]
}

pub fn is_framework_service(ty: &TypeDescriptor) -> bool {
    framework_services().iter().any(|candidate| candidate == ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_shapes_are_open_generics() {
        for shape in unknown_collections() {
            assert!(shape.is_open_generic(), "{} should be open", shape);
            assert!(is_unknown_collection(&shape));
        }
        assert!(!is_unknown_collection(&lazy()));
    }

    #[test]
    fn static_injection_context_has_no_public_constructor() {
        assert!(!static_injection_context().has_instantiable_constructor());
        assert!(is_framework_service(&static_injection_context()));
    }

    #[test]
    fn primitive_lookup() {
        assert!(primitive("u32").map(|p| p.is_primitive()).unwrap_or(false));
        assert!(primitive("f32").is_some());
        assert!(primitive("String").is_none());
    }

    #[test]
    fn factory_is_a_generic_delegate() {
        let factory = factory();
        assert!(factory.is_delegate());
        assert!(factory.is_open_generic());
    }
}
