use alloc::sync::Arc;
use core::any::Any;

use crate::property::Property;

/// What a visitor adapter sees of a property.
pub struct PropertyInfo<'a> {
    pub property: &'a Property,
    /// The concrete [`Storage`](crate::property::Storage) of the property.
    pub storage: &'a dyn Any,
}

impl PropertyInfo<'_> {
    /// Downcasts the storage, e.g. to `FieldStorage<C, A>` to reach its
    /// projections.
    #[inline]
    pub fn storage<S: Any>(&self) -> Option<&S> {
        self.storage.downcast_ref::<S>()
    }
}

/// Turns a property into calls on a visitor of a type the adapter knows.
///
/// Adapters downcast the visitor and ignore visitors they do not know.
pub type VisitorAdapter = Arc<dyn Fn(&mut dyn Any, &PropertyInfo<'_>) + Send + Sync>;
