use core::any::TypeId;

use crate::hash::NoOpHashState;
use crate::hash::hashbrown::HashMap;

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map keyed by [`TypeId`].
///
/// `TypeId` is already a hash, so the map skips rehashing through
/// [`NoOpHashState`].
pub struct TypeIdMap<V>(HashMap<TypeId, V, NoOpHashState>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use vc_utils::TypeIdMap;
    ///
    /// let map = TypeIdMap::<u32>::new();
    /// assert!(map.get(&TypeId::of::<u32>()).is_none());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(NoOpHashState))
    }

    /// Returns a reference to the value of `type_id`.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Inserts a value, returning the previous one.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    /// Removes `type_id`, returning its value.
    #[inline]
    pub fn remove(&mut self, type_id: &TypeId) -> Option<V> {
        self.0.remove(type_id)
    }
}

impl<V> Default for TypeIdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn insert_replaces_and_remove_clears() {
        let mut map = TypeIdMap::new();
        assert_eq!(map.insert(TypeId::of::<u8>(), 1), None);
        assert_eq!(map.insert(TypeId::of::<u8>(), 2), Some(1));
        assert_eq!(map.get(&TypeId::of::<u8>()), Some(&2));
        assert_eq!(map.get(&TypeId::of::<u16>()), None);

        assert_eq!(map.remove(&TypeId::of::<u8>()), Some(2));
        assert_eq!(map.get(&TypeId::of::<u8>()), None);
    }
}
