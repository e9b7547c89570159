//! Type handles, records and drafts.
//!
//! ## Menu
//!
//! - [`Type`]: a `Copy` handle to a registry slot.
//! - [`TypeRecord`]: the data stored in a slot.
//! - [`TypeDraft`]: what a [`Typed`] type hands to the registry on first access.
//! - [`BaseClass`]: a base edge with its explicit upcast functions.
//! - [`TypeTraits`]: the trait bitset of a type.

// -----------------------------------------------------------------------------
// Modules

mod draft;
mod impls;
mod record;
mod typed;

pub(crate) mod name;

// -----------------------------------------------------------------------------
// Exports

pub use draft::{BaseClass, CreateFn, TemplateArgument, TypeDraft, Upcast};
pub use record::{ClassData, TypeRecord, TypeVisit, VisitTypeFn};
pub use typed::Typed;

use core::fmt;

// -----------------------------------------------------------------------------
// Type

/// A stable handle to a slot of a [`TypeRegistry`].
///
/// Slots are never removed, a handle keeps pointing at the same slot for the
/// lifetime of its registry. Unregistering a type flips the slot to invalid,
/// registering the same canonical name again makes it valid in place.
///
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Type {
    index: u32,
}

impl Type {
    /// The invalid sentinel, slot `0` of every registry.
    pub const INVALID: Type = Type { index: 0 };

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self {
            index: index as u32,
        }
    }

    /// The slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns `true` for [`Type::INVALID`].
    ///
    /// A non-sentinel handle may still point at an unregistered slot,
    /// see [`TypeRegistry::is_valid`](crate::registry::TypeRegistry::is_valid).
    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.index == 0
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.index)
    }
}

impl Default for Type {
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

// -----------------------------------------------------------------------------
// TypeTraits

bitflags::bitflags! {
    /// Categories a type belongs to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeTraits: u16 {
        const CLASS = 1 << 0;
        const ENUM = 1 << 1;
        const ARRAY = 1 << 2;
        const POINTER = 1 << 3;
        const ARITHMETIC = 1 << 4;
        const FUNCTION_POINTER = 1 << 5;
        const MEMBER_OBJECT_POINTER = 1 << 6;
        const MEMBER_FUNCTION_POINTER = 1 << 7;
        const ASSOCIATIVE_CONTAINER = 1 << 8;
        const SEQUENTIAL_CONTAINER = 1 << 9;
        const TEMPLATE_INSTANTIATION = 1 << 10;
    }
}
