//! Type and member descriptors the resolvability engine reasons about.
//!
//! A [`TypeDescriptor`] is a small reflection model: enough shape
//! information (interface, delegate, array, open or closed generic,
//! primitive, constructor visibility) to decide whether a type could be
//! produced without producing it.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Broad classification of a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Concrete type that may be constructed directly
    Class,
    /// Abstract contract (a trait object); never auto-registered
    Interface,
    /// Callable type; never auto-registered
    Delegate,
    /// Built-in scalar
    Primitive,
}

/// Constructor accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Crate,
    Private,
}

/// Shape of one declared constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorInfo {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl ConstructorInfo {
    /// Public instance constructor.
    pub const fn public() -> Self {
        Self { visibility: Visibility::Public, is_static: false, is_abstract: false }
    }

    /// Private instance constructor.
    pub const fn private() -> Self {
        Self { visibility: Visibility::Private, is_static: false, is_abstract: false }
    }

    /// Public static initializer (never usable to create an instance).
    pub const fn static_initializer() -> Self {
        Self { visibility: Visibility::Public, is_static: true, is_abstract: false }
    }

    /// Public, non-static, non-abstract.
    pub fn is_instantiable(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_static && !self.is_abstract
    }
}

/// Definition of a named type or open generic.
///
/// Identity is the `(name, arity)` pair; kind and constructors are
/// descriptive data hanging off that identity.
#[derive(Debug)]
pub struct TypeDef {
    name: Arc<str>,
    kind: TypeKind,
    arity: usize,
    constructors: Vec<ConstructorInfo>,
}

impl TypeDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Number of generic parameters; zero for non-generic types.
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }
}

impl PartialEq for TypeDef {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.name == other.name
    }
}

impl Eq for TypeDef {}

impl Hash for TypeDef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.arity.hash(state);
    }
}

/// Builder for type definitions with custom constructor lists.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{TypeDefBuilder, TypeKind, ConstructorInfo};
///
/// // A class whose only constructor is private
/// let token = TypeDefBuilder::new("app::Token")
///     .constructor(ConstructorInfo::private())
///     .build();
/// assert!(!token.has_instantiable_constructor());
///
/// let repo = TypeDefBuilder::new("app::Repository")
///     .kind(TypeKind::Class)
///     .arity(1)
///     .public_constructor()
///     .build();
/// assert!(repo.is_open_generic());
/// ```
#[derive(Debug, Clone)]
pub struct TypeDefBuilder {
    name: String,
    kind: TypeKind,
    arity: usize,
    constructors: Vec<ConstructorInfo>,
}

impl TypeDefBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: TypeKind::Class, arity: 0, constructors: Vec::new() }
    }

    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn public_constructor(self) -> Self {
        self.constructor(ConstructorInfo::public())
    }

    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor::Defined(Arc::new(TypeDef {
            name: self.name.into(),
            kind: self.kind,
            arity: self.arity,
            constructors: self.constructors,
        }))
    }
}

/// A requested type.
///
/// Cloning is cheap; every shape shares its definition through `Arc`.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::TypeDescriptor;
///
/// let vec = TypeDescriptor::generic_class("alloc::vec::Vec", 1);
/// let user = TypeDescriptor::class("app::User");
///
/// let users = vec.make_generic([user.clone()]).unwrap();
/// assert!(users.is_constructed_generic());
/// assert_eq!(users.generic_type_definition(), Some(vec));
/// assert_eq!(users.generic_arguments(), &[user.clone()]);
/// assert_eq!(users.to_string(), "alloc::vec::Vec<app::User>");
///
/// let array = TypeDescriptor::array(user.clone());
/// assert_eq!(array.element_type(), Some(&user));
/// assert_eq!(array.to_string(), "app::User[]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Non-generic type, or an open generic definition when `arity > 0`
    Defined(Arc<TypeDef>),
    /// Generic definition closed over concrete arguments
    Constructed {
        definition: Arc<TypeDef>,
        arguments: Arc<[TypeDescriptor]>,
    },
    /// Array of an element type
    Array(Arc<TypeDescriptor>),
    /// Unbound generic parameter such as `T`
    GenericParameter(Arc<str>),
}

impl TypeDescriptor {
    /// Concrete type with a public constructor.
    pub fn class(name: impl Into<String>) -> Self {
        TypeDefBuilder::new(name).public_constructor().build()
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeDefBuilder::new(name).kind(TypeKind::Interface).build()
    }

    pub fn delegate(name: impl Into<String>) -> Self {
        TypeDefBuilder::new(name).kind(TypeKind::Delegate).public_constructor().build()
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        TypeDefBuilder::new(name).kind(TypeKind::Primitive).public_constructor().build()
    }

    /// Open generic class definition with a public constructor.
    pub fn generic_class(name: impl Into<String>, arity: usize) -> Self {
        TypeDefBuilder::new(name).arity(arity).public_constructor().build()
    }

    /// Open generic interface definition.
    pub fn generic_interface(name: impl Into<String>, arity: usize) -> Self {
        TypeDefBuilder::new(name).kind(TypeKind::Interface).arity(arity).build()
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Arc::new(element))
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        TypeDescriptor::GenericParameter(name.into().into())
    }

    /// Describes a Rust type by `std::any::type_name`.
    ///
    /// Scalars become primitives; anything else is a constructible class.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let name = std::any::type_name::<T>();
        crate::well_known::primitive(name).unwrap_or_else(|| Self::class(name))
    }

    /// Definition backing `Defined` and `Constructed` shapes.
    pub fn definition(&self) -> Option<&Arc<TypeDef>> {
        match self {
            TypeDescriptor::Defined(def) => Some(def),
            TypeDescriptor::Constructed { definition, .. } => Some(definition),
            TypeDescriptor::Array(_) | TypeDescriptor::GenericParameter(_) => None,
        }
    }

    pub fn kind(&self) -> Option<TypeKind> {
        self.definition().map(|def| def.kind)
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == Some(TypeKind::Interface)
    }

    pub fn is_delegate(&self) -> bool {
        self.kind() == Some(TypeKind::Delegate)
    }

    pub fn is_primitive(&self) -> bool {
        self.kind() == Some(TypeKind::Primitive)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Array(_))
    }

    pub fn is_constructed_generic(&self) -> bool {
        matches!(self, TypeDescriptor::Constructed { .. })
    }

    pub fn is_open_generic(&self) -> bool {
        matches!(self, TypeDescriptor::Defined(def) if def.arity > 0)
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeDescriptor::GenericParameter(_))
    }

    /// Open definition of a generic type; `None` for non-generic shapes.
    pub fn generic_type_definition(&self) -> Option<TypeDescriptor> {
        match self {
            TypeDescriptor::Constructed { definition, .. } => {
                Some(TypeDescriptor::Defined(definition.clone()))
            }
            TypeDescriptor::Defined(def) if def.arity > 0 => Some(self.clone()),
            _ => None,
        }
    }

    /// Arguments of a closed generic; empty otherwise.
    pub fn generic_arguments(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Constructed { arguments, .. } => &arguments[..],
            _ => &[],
        }
    }

    pub fn element_type(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(element) => Some(element),
            _ => None,
        }
    }

    /// True when at least one constructor is public, non-static and non-abstract.
    pub fn has_instantiable_constructor(&self) -> bool {
        self.definition()
            .map(|def| def.constructors.iter().any(ConstructorInfo::is_instantiable))
            .unwrap_or(false)
    }

    /// Closes an open generic definition over `arguments`.
    pub fn make_generic<I>(&self, arguments: I) -> DiResult<TypeDescriptor>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let arguments: Arc<[TypeDescriptor]> = arguments.into_iter().collect();
        match self {
            TypeDescriptor::Defined(def) if def.arity > 0 && def.arity == arguments.len() => {
                Ok(TypeDescriptor::Constructed { definition: def.clone(), arguments })
            }
            _ => Err(DiError::GenericArity {
                name: self.to_string(),
                expected: self.definition().map(|def| def.arity).unwrap_or(0),
                actual: arguments.len(),
            }),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Defined(def) if def.arity > 0 => {
                let placeholders = vec!["_"; def.arity].join(", ");
                write!(f, "{}<{}>", def.name, placeholders)
            }
            TypeDescriptor::Defined(def) => f.write_str(&def.name),
            TypeDescriptor::Constructed { definition, arguments } => {
                write!(f, "{}<", definition.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                f.write_str(">")
            }
            TypeDescriptor::Array(element) => write!(f, "{}[]", element),
            TypeDescriptor::GenericParameter(name) => f.write_str(name),
        }
    }
}

/// Whether an injectable member is a property or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Field,
}

/// An injectable member of a constructed type.
///
/// # Examples
///
/// ```rust
/// use ferrous_locate::{MemberDescriptor, MemberKind, TypeDescriptor};
///
/// let service = TypeDescriptor::class("app::ReportService");
/// let member = MemberDescriptor::property(service, "clock", TypeDescriptor::interface("app::Clock"));
///
/// assert_eq!(member.name(), "clock");
/// assert_eq!(member.kind(), MemberKind::Property);
/// assert_eq!(member.to_string(), "app::ReportService::clock");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDescriptor {
    declaring_type: TypeDescriptor,
    name: Arc<str>,
    member_type: TypeDescriptor,
    kind: MemberKind,
}

impl MemberDescriptor {
    pub fn new(
        declaring_type: TypeDescriptor,
        name: impl Into<String>,
        member_type: TypeDescriptor,
        kind: MemberKind,
    ) -> Self {
        Self { declaring_type, name: name.into().into(), member_type, kind }
    }

    pub fn property(declaring_type: TypeDescriptor, name: impl Into<String>, member_type: TypeDescriptor) -> Self {
        Self::new(declaring_type, name, member_type, MemberKind::Property)
    }

    pub fn field(declaring_type: TypeDescriptor, name: impl Into<String>, member_type: TypeDescriptor) -> Self {
        Self::new(declaring_type, name, member_type, MemberKind::Field)
    }

    pub fn declaring_type(&self) -> &TypeDescriptor {
        &self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn member_type(&self) -> &TypeDescriptor {
        &self.member_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_type, self.name)
    }
}
