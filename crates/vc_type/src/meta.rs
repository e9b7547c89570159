//! Metadata attached to types, properties and methods.
//!
//! A [`MetadataTable`] maps 64-bit keys to erased values. Keys are usually
//! produced by [`metadata_key`] from a readable name.
//!
//! Two upsert policies exist and they are kept apart on purpose:
//!
//! - [`MetadataTable::new`] builds from a batch: stable sort by key, then the
//!   first entry of every key survives.
//! - [`MetadataTable::amend`] adds to an existing table: an entry whose key is
//!   already present is dropped, the stored value is never replaced.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Debug;

use vc_utils::hash::hash_str;

// -----------------------------------------------------------------------------
// Key

/// Computes the metadata key of a name.
///
/// # Examples
///
/// ```
/// use vc_type::meta::metadata_key;
///
/// const DESCRIPTION: u64 = metadata_key("description");
/// assert_eq!(DESCRIPTION, metadata_key("description"));
/// ```
#[inline]
pub const fn metadata_key(name: &str) -> u64 {
    hash_str(name)
}

// -----------------------------------------------------------------------------
// MetaValue

/// An erased metadata value.
pub struct MetaValue(Option<Box<dyn Any + Send + Sync>>);

static EMPTY_META_VALUE: MetaValue = MetaValue(None);

impl MetaValue {
    /// Boxes a value.
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// The process-wide empty value, returned by every failed lookup.
    #[inline]
    pub fn empty() -> &'static MetaValue {
        &EMPTY_META_VALUE
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns the stored value if it is a `T`.
    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }
}

impl Debug for MetaValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("MetaValue(..)"),
            None => f.write_str("MetaValue(<empty>)"),
        }
    }
}

// -----------------------------------------------------------------------------
// Metadata

/// A single `(key, value)` entry.
#[derive(Debug)]
pub struct Metadata {
    key: u64,
    value: MetaValue,
}

impl Metadata {
    #[inline]
    pub fn new<T: Any + Send + Sync>(key: u64, value: T) -> Self {
        Self {
            key,
            value: MetaValue::new(value),
        }
    }

    /// Creates an entry keyed by [`metadata_key`] of `name`.
    #[inline]
    pub fn named<T: Any + Send + Sync>(name: &str, value: T) -> Self {
        Self::new(metadata_key(name), value)
    }

    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &MetaValue {
        &self.value
    }
}

// -----------------------------------------------------------------------------
// MetadataTable

/// Entries sorted ascending by key.
#[derive(Debug, Default)]
pub struct MetadataTable {
    entries: Vec<Metadata>,
}

impl MetadataTable {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a table from an unordered batch.
    ///
    /// Duplicated keys keep their first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_type::meta::{Metadata, MetadataTable};
    ///
    /// let table = MetadataTable::new(vec![
    ///     Metadata::new(1, "first"),
    ///     Metadata::new(2, 20_u32),
    ///     Metadata::new(1, "second"),
    /// ]);
    ///
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.get(1).get::<&str>(), Some(&"first"));
    /// assert!(table.get(3).is_empty());
    /// ```
    pub fn new(mut entries: Vec<Metadata>) -> Self {
        // `sort_by_key` is stable, equal keys keep their batch order.
        entries.sort_by_key(|m| m.key);
        entries.dedup_by_key(|m| m.key);
        Self { entries }
    }

    /// Appends entries whose key is not present yet, then re-sorts.
    ///
    /// Returns the number of inserted entries.
    pub fn amend(&mut self, entries: Vec<Metadata>) -> usize {
        let mut inserted = 0;
        for item in entries {
            if self.entries.iter().any(|m| m.key == item.key) {
                continue;
            }
            self.entries.push(item);
            inserted += 1;
        }
        self.entries.sort_by_key(|m| m.key);
        inserted
    }

    /// Returns the value of `key`, or [`MetaValue::empty`].
    pub fn get(&self, key: u64) -> &MetaValue {
        match self.entries.binary_search_by_key(&key, |m| m.key) {
            Ok(index) => &self.entries[index].value,
            Err(_) => MetaValue::empty(),
        }
    }

    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        !self.get(key).is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Metadata> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{MetaValue, Metadata, MetadataTable, metadata_key};

    #[test]
    fn batch_keeps_first_duplicate() {
        let table = MetadataTable::new(vec![
            Metadata::new(7, 1_i32),
            Metadata::new(3, 2_i32),
            Metadata::new(7, 3_i32),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(7).get::<i32>(), Some(&1));
        assert_eq!(table.get(3).get::<i32>(), Some(&2));
        assert!(core::ptr::eq(table.get(11), MetaValue::empty()));
    }

    #[test]
    fn amend_skips_existing_keys() {
        let mut table = MetadataTable::new(vec![Metadata::named("tooltip", "old")]);
        let inserted = table.amend(vec![
            Metadata::named("tooltip", "new"),
            Metadata::named("category", "io"),
            Metadata::named("category", "net"),
        ]);

        assert_eq!(inserted, 1);
        assert_eq!(table.get(metadata_key("tooltip")).get::<&str>(), Some(&"old"));
        assert_eq!(table.get(metadata_key("category")).get::<&str>(), Some(&"io"));
        let keys: vec::Vec<u64> = table.iter().map(Metadata::key).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn wrong_type_probe() {
        let table = MetadataTable::new(vec![Metadata::new(1, 5_u8)]);
        assert!(table.get(1).get::<u16>().is_none());
        assert!(!table.get(1).is_empty());
    }
}
