//! Conversion and comparison tables.
//!
//! Both are vectors of `(type, payload)` kept sorted by type with a stable
//! sort. A lookup binary-searches the first entry of a type, then scans the
//! entries sharing it.

// -----------------------------------------------------------------------------
// Modules

mod comparator;
mod converter;
mod data_table;

// -----------------------------------------------------------------------------
// Exports

pub use comparator::TypeComparator;
pub use converter::TypeConverter;

pub(crate) use data_table::DataTable;
