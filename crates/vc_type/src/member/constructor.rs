use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::member::AccessLevel;
use crate::registry::TypeRegistry;
use crate::ty::{Type, Typed};
use crate::value::Variant;

type ConstructFn = Arc<dyn Fn(&mut [Variant<'_>]) -> Variant<'static> + Send + Sync>;

/// Creates boxed values of its declaring type.
#[derive(Clone)]
pub struct Constructor {
    declaring_type: Type,
    parameter_types: Vec<Type>,
    access: AccessLevel,
    invoker: ConstructFn,
}

impl Constructor {
    pub fn new<F>(declaring_type: Type, parameter_types: Vec<Type>, invoker: F) -> Self
    where
        F: Fn(&mut [Variant<'_>]) -> Variant<'static> + Send + Sync + 'static,
    {
        Self {
            declaring_type,
            parameter_types,
            access: AccessLevel::Public,
            invoker: Arc::new(invoker),
        }
    }

    /// The parameterless constructor of `T`, built from [`Default`].
    pub fn from_default<T: Typed + Default>(registry: &mut TypeRegistry) -> Self {
        Self::new(registry.register::<T>(), Vec::new(), |_| {
            Variant::new(T::default())
        })
    }

    #[inline]
    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    #[inline]
    pub fn parameter_types(&self) -> &[Type] {
        &self.parameter_types
    }

    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.access
    }

    /// Runs the constructor. An `Empty` result means the arguments did not fit.
    #[inline]
    pub fn invoke(&self, args: &mut [Variant<'_>]) -> Variant<'static> {
        (self.invoker)(args)
    }

    #[inline]
    pub(crate) fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.invoker, &other.invoker)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("declaring_type", &self.declaring_type)
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}
