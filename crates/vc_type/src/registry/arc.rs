use alloc::sync::{Arc, Weak};
use std::sync::{LazyLock, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::registry::TypeRegistry;
use crate::ty::{Type, Typed};

static GLOBAL_REGISTRY: LazyLock<TypeRegistryArc> =
    LazyLock::new(|| TypeRegistryArc::new(TypeRegistry::new()));

// -----------------------------------------------------------------------------
// TypeRegistryArc

/// A shared [`TypeRegistry`] behind one reader/writer lock.
///
/// Every mutation runs entirely under the write lock.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }

    /// The process-wide registry, created with [`TypeRegistry::new`] on
    /// first use.
    #[inline]
    pub fn global() -> &'static TypeRegistryArc {
        &GLOBAL_REGISTRY
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The handle of `T`, registering it on first use.
    ///
    /// Looks up under the read lock first. Threads racing on the first
    /// registration all get the same handle.
    pub fn get<T: Typed>(&self) -> Type {
        if let Some(ty) = self.read().get::<T>() {
            return ty;
        }
        self.write().register::<T>()
    }

    #[inline]
    pub(super) fn downgrade(&self) -> Weak<RwLock<TypeRegistry>> {
        Arc::downgrade(&self.internal)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}
