use core::any::{Any, TypeId};

use crate::registry::TypeRegistry;

/// The object a property or method is applied to.
///
/// Static members ignore it, [`Instance::Empty`] is fine for them.
#[derive(Default)]
pub enum Instance<'a> {
    #[default]
    Empty,
    Ref(&'a dyn Any),
    Mut(&'a mut dyn Any),
}

impl<'a> Instance<'a> {
    #[inline]
    pub fn from_ref<T: Any>(obj: &'a T) -> Self {
        Self::Ref(obj)
    }

    #[inline]
    pub fn from_mut<T: Any>(obj: &'a mut T) -> Self {
        Self::Mut(obj)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn is_mut(&self) -> bool {
        matches!(self, Self::Mut(_))
    }

    /// The [`TypeId`] of the object.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Self::Empty => None,
            Self::Ref(obj) => Some((**obj).type_id()),
            Self::Mut(obj) => Some((**obj).type_id()),
        }
    }

    /// Views the object as a `C`.
    ///
    /// An object of a registered derived type is adjusted along the base
    /// class graph, see [`TypeRegistry::apply_offset`].
    pub fn try_convert<C: Any>(self, registry: &TypeRegistry) -> Option<&'a C> {
        let obj: &'a dyn Any = match self {
            Self::Empty => return None,
            Self::Ref(obj) => obj,
            Self::Mut(obj) => obj,
        };
        if obj.is::<C>() {
            return obj.downcast_ref::<C>();
        }
        let source = registry.get_by_type_id(obj.type_id())?;
        let target = registry.get_by_type_id(TypeId::of::<C>())?;
        registry
            .apply_offset(obj, source, target)?
            .downcast_ref::<C>()
    }

    /// Views the object as a mutable `C`. Fails for a shared instance.
    pub fn try_convert_mut<C: Any>(self, registry: &TypeRegistry) -> Option<&'a mut C> {
        let Self::Mut(obj) = self else {
            return None;
        };
        if obj.is::<C>() {
            return obj.downcast_mut::<C>();
        }
        let source = registry.get_by_type_id((*obj).type_id())?;
        let target = registry.get_by_type_id(TypeId::of::<C>())?;
        registry
            .apply_offset_mut(obj, source, target)?
            .downcast_mut::<C>()
    }
}

impl core::fmt::Debug for Instance<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => f.write_str("Instance::Empty"),
            Self::Ref(_) => f.write_str("Instance::Ref"),
            Self::Mut(_) => f.write_str("Instance::Mut"),
        }
    }
}
