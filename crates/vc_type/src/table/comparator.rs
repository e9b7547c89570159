use core::any::Any;

use crate::registry::TypeRegistry;
use crate::ty::{Type, Typed};

fn erased_eq<T: PartialEq + 'static>(lhs: &dyn Any, rhs: &dyn Any) -> bool {
    match (lhs.downcast_ref::<T>(), rhs.downcast_ref::<T>()) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

fn erased_lt<T: PartialOrd + 'static>(lhs: &dyn Any, rhs: &dyn Any) -> bool {
    match (lhs.downcast_ref::<T>(), rhs.downcast_ref::<T>()) {
        (Some(lhs), Some(rhs)) => lhs < rhs,
        _ => false,
    }
}

/// A binary predicate over two values of one type.
///
/// Registered either as the equal comparator or as the less-than
/// comparator of its type.
#[derive(Clone, Copy)]
pub struct TypeComparator {
    ty: Type,
    func: fn(&dyn Any, &dyn Any) -> bool,
}

impl TypeComparator {
    /// `==` of `T`.
    pub fn equal<T: Typed + PartialEq>(registry: &mut TypeRegistry) -> Self {
        Self {
            ty: registry.register::<T>(),
            func: erased_eq::<T>,
        }
    }

    /// `<` of `T`.
    pub fn less_than<T: Typed + PartialOrd>(registry: &mut TypeRegistry) -> Self {
        Self {
            ty: registry.register::<T>(),
            func: erased_lt::<T>,
        }
    }

    #[inline]
    pub const fn from_fn(ty: Type, func: fn(&dyn Any, &dyn Any) -> bool) -> Self {
        Self { ty, func }
    }

    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn compare(&self, lhs: &dyn Any, rhs: &dyn Any) -> bool {
        (self.func)(lhs, rhs)
    }
}

impl core::fmt::Debug for TypeComparator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("TypeComparator").field(&self.ty).finish()
    }
}
