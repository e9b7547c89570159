use alloc::string::String;
use alloc::vec::Vec;

use crate::meta::{MetaValue, Metadata, MetadataTable};
use crate::ty::Type;

/// Name/value table of an enum type.
#[derive(Debug)]
pub struct Enumeration {
    declaring_type: Type,
    underlying_type: Type,
    entries: Vec<(String, i64)>,
    metadata: MetadataTable,
}

impl Enumeration {
    pub fn new(declaring_type: Type, underlying_type: Type) -> Self {
        Self {
            declaring_type,
            underlying_type,
            entries: Vec::new(),
            metadata: MetadataTable::empty(),
        }
    }

    /// Adds an entry. A name already present is ignored.
    pub fn value(mut self, name: impl Into<String>, value: i64) -> Self {
        let name = name.into();
        if !self.entries.iter().any(|(n, _)| *n == name) {
            self.entries.push((name, value));
        }
        self
    }

    pub fn metadata(mut self, metadata: Vec<Metadata>) -> Self {
        self.metadata = MetadataTable::new(metadata);
        self
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    #[inline]
    pub fn underlying_type(&self) -> Type {
        self.underlying_type
    }

    /// The first name registered for `value`.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = i64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    #[inline]
    pub fn get_metadata(&self, key: u64) -> &MetaValue {
        self.metadata.get(key)
    }
}
