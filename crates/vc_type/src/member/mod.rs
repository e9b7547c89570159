//! Methods, constructors, destructors and enumerations.
//!
//! These are the items besides properties that attach to a type record.

// -----------------------------------------------------------------------------
// Modules

mod constructor;
mod destructor;
mod enumeration;
mod method;

// -----------------------------------------------------------------------------
// Exports

pub use constructor::Constructor;
pub use destructor::Destructor;
pub use enumeration::Enumeration;
pub use method::{Method, MethodBuilder};

// -----------------------------------------------------------------------------
// AccessLevel

/// Declared visibility of a member. Fixed at registration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Private,
}
