use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::registry::TypeRegistry;
use crate::ty::{Type, Typed};

type ConvertFn = Arc<dyn Fn(&dyn Any) -> Option<Box<dyn Any>> + Send + Sync>;

/// Converts a value of `source` into a value of `target`.
#[derive(Clone)]
pub struct TypeConverter {
    source: Type,
    target: Type,
    func: ConvertFn,
}

impl TypeConverter {
    /// A converter from `S` to `T`, registering both types if needed.
    pub fn new<S: Typed, T: Typed>(registry: &mut TypeRegistry, f: fn(&S) -> Option<T>) -> Self {
        let func: ConvertFn = Arc::new(move |value: &dyn Any| {
            let value = value.downcast_ref::<S>()?;
            f(value).map(|v| Box::new(v) as Box<dyn Any>)
        });
        Self {
            source: registry.register::<S>(),
            target: registry.register::<T>(),
            func,
        }
    }

    #[inline]
    pub fn source(&self) -> Type {
        self.source
    }

    #[inline]
    pub fn target(&self) -> Type {
        self.target
    }

    /// Converts `value`. `None` for a value of another type or a failed
    /// conversion.
    #[inline]
    pub fn convert(&self, value: &dyn Any) -> Option<Box<dyn Any>> {
        (self.func)(value)
    }
}

impl fmt::Debug for TypeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConverter")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}
