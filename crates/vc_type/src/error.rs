use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// A property declaration that can never work.
///
/// Returned by [`PropertyBuilder::build`](crate::property::PropertyBuilder::build)
/// before anything reaches the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("property `{0}` binds a pointer type as pointer")]
    PointerPolicyOnPointer(String),

    #[error("property `{0}` binds by pointer or reference but its getter returns by value")]
    BorrowRequired(String),

    #[error("property `{0}` is read-write but has no setter")]
    MissingSetter(String),
}
