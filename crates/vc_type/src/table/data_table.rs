use alloc::vec::Vec;

use crate::ty::Type;

/// `(type, payload)` pairs sorted by type, equal types in insertion order.
pub(crate) struct DataTable<P> {
    items: Vec<(Type, P)>,
}

impl<P> DataTable<P> {
    #[inline]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[inline]
    fn lower_bound(&self, ty: Type) -> usize {
        self.items.partition_point(|(t, _)| *t < ty)
    }

    /// The first payload of `ty` accepted by `pred`.
    pub fn find(&self, ty: Type, mut pred: impl FnMut(&P) -> bool) -> Option<&P> {
        self.items[self.lower_bound(ty)..]
            .iter()
            .take_while(|(t, _)| *t == ty)
            .map(|(_, p)| p)
            .find(|p| pred(p))
    }

    /// Appends and restores the order.
    pub fn insert(&mut self, ty: Type, payload: P) {
        self.items.push((ty, payload));
        self.items.sort_by_key(|(t, _)| *t);
    }

    /// Removes the first payload of `ty` accepted by `pred`.
    pub fn remove(&mut self, ty: Type, mut pred: impl FnMut(&P) -> bool) -> bool {
        let start = self.lower_bound(ty);
        let found = self.items[start..]
            .iter()
            .take_while(|(t, _)| *t == ty)
            .position(|(_, p)| pred(p));
        match found {
            Some(offset) => {
                self.items.remove(start + offset);
                true
            }
            None => false,
        }
    }

    /// Removes every payload of `ty`.
    pub fn remove_all(&mut self, ty: Type) -> usize {
        let before = self.items.len();
        self.items.retain(|(t, _)| *t != ty);
        before - self.items.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.items.iter().map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::DataTable;
    use crate::ty::Type;

    #[test]
    fn sorted_with_stable_ties() {
        let mut table = DataTable::new();
        table.insert(Type::from_index(5), 'a');
        table.insert(Type::from_index(2), 'b');
        table.insert(Type::from_index(5), 'c');
        table.insert(Type::from_index(3), 'd');

        let order: alloc::string::String = table.iter().collect();
        assert_eq!(order, "bdac");
        assert_eq!(table.find(Type::from_index(5), |p| *p == 'c'), Some(&'c'));
        assert_eq!(table.find(Type::from_index(4), |_| true), None);
    }

    #[test]
    fn remove_matches_identity() {
        let mut table = DataTable::new();
        table.insert(Type::from_index(1), 10);
        table.insert(Type::from_index(1), 20);

        assert!(!table.remove(Type::from_index(1), |p| *p == 30));
        assert!(table.remove(Type::from_index(1), |p| *p == 20));
        assert_eq!(table.iter().count(), 1);
        assert_eq!(table.remove_all(Type::from_index(1)), 1);
    }
}
