use core::any::Any;

use crate::registry::TypeRegistry;
use crate::ty::{Type, Typed};
use crate::value::Variant;

fn drop_value<T: Any>(value: &mut Variant<'_>) -> bool {
    value.take::<T>().is_some()
}

/// Destroys boxed values of its declaring type.
#[derive(Clone, Copy)]
pub struct Destructor {
    declaring_type: Type,
    func: fn(&mut Variant<'_>) -> bool,
}

impl Destructor {
    pub fn of<T: Typed>(registry: &mut TypeRegistry) -> Self {
        Self {
            declaring_type: registry.register::<T>(),
            func: drop_value::<T>,
        }
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    /// Drops the owned value of `value`, leaving it `Empty`.
    ///
    /// Returns `false` for borrowed shapes and values of another type.
    #[inline]
    pub fn invoke(&self, value: &mut Variant<'_>) -> bool {
        (self.func)(value)
    }
}

impl core::fmt::Debug for Destructor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Destructor").field(&self.declaring_type).finish()
    }
}
