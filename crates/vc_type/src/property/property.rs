use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use std::sync::LazyLock;

use crate::member::AccessLevel;
use crate::meta::MetaValue;
use crate::registry::TypeRegistry;
use crate::ty::Type;
use crate::value::{Instance, Variant};

// -----------------------------------------------------------------------------
// PropertyAccessor

/// The fixed surface every property implementation provides.
///
/// Failures are never panics: a wrong instance or argument type yields an
/// `Empty` variant or `false`.
pub trait PropertyAccessor: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// [`Type::INVALID`] for global properties.
    fn declaring_type(&self) -> Type;

    fn access_level(&self) -> AccessLevel;

    fn is_valid(&self) -> bool {
        true
    }

    fn is_readonly(&self) -> bool;

    fn is_static(&self) -> bool;

    /// The logical exposed type, which depends on the bind policy.
    fn value_type(&self) -> Type;

    fn metadata(&self, key: u64) -> &MetaValue;

    fn get_value<'a>(&self, registry: &TypeRegistry, instance: Instance<'a>) -> Variant<'a>;

    fn set_value_copy(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool;

    fn set_value_move(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool;

    fn visit(&self, visitor: &mut dyn Any, property: &Property);
}

// -----------------------------------------------------------------------------
// InvalidProperty

struct InvalidProperty;

impl PropertyAccessor for InvalidProperty {
    fn name(&self) -> &str {
        ""
    }

    fn declaring_type(&self) -> Type {
        Type::INVALID
    }

    fn access_level(&self) -> AccessLevel {
        AccessLevel::Public
    }

    fn is_valid(&self) -> bool {
        false
    }

    fn is_readonly(&self) -> bool {
        true
    }

    fn is_static(&self) -> bool {
        false
    }

    fn value_type(&self) -> Type {
        Type::INVALID
    }

    fn metadata(&self, _: u64) -> &MetaValue {
        MetaValue::empty()
    }

    fn get_value<'a>(&self, _: &TypeRegistry, _: Instance<'a>) -> Variant<'a> {
        Variant::Empty
    }

    fn set_value_copy(&self, _: &TypeRegistry, _: Instance<'_>, _: &mut Variant<'_>) -> bool {
        false
    }

    fn set_value_move(&self, _: &TypeRegistry, _: Instance<'_>, _: &mut Variant<'_>) -> bool {
        false
    }

    fn visit(&self, _: &mut dyn Any, _: &Property) {}
}

static INVALID_PROPERTY: LazyLock<Property> = LazyLock::new(|| Property::new(InvalidProperty));

// -----------------------------------------------------------------------------
// Property

/// Shared handle to a property accessor.
///
/// Two handles are equal when they share the same accessor.
#[derive(Clone)]
pub struct Property(Arc<dyn PropertyAccessor>);

impl Property {
    #[inline]
    pub fn new<P: PropertyAccessor>(accessor: P) -> Self {
        Self(Arc::new(accessor))
    }

    /// The null property, returned by lookups that find nothing.
    #[inline]
    pub fn invalid() -> Self {
        INVALID_PROPERTY.clone()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.0.declaring_type()
    }

    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.0.access_level()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_valid()
    }

    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.0.is_readonly()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.0.is_static()
    }

    #[inline]
    pub fn value_type(&self) -> Type {
        self.0.value_type()
    }

    #[inline]
    pub fn metadata(&self, key: u64) -> &MetaValue {
        self.0.metadata(key)
    }

    #[inline]
    pub fn get_value<'a>(&self, registry: &TypeRegistry, instance: Instance<'a>) -> Variant<'a> {
        self.0.get_value(registry, instance)
    }

    /// Writes a copy of `arg`.
    #[inline]
    pub fn set_value(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool {
        self.0.set_value_copy(registry, instance, arg)
    }

    /// Moves `arg` in when the setter takes its value by value.
    #[inline]
    pub fn set_value_move(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool {
        self.0.set_value_move(registry, instance, arg)
    }

    /// Runs the visitor adapters declared with the property.
    #[inline]
    pub fn visit(&self, visitor: &mut dyn Any) {
        self.0.visit(visitor, self);
    }
}

impl PartialEq for Property {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Property {}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("declaring_type", &self.declaring_type())
            .field("value_type", &self.value_type())
            .finish_non_exhaustive()
    }
}
