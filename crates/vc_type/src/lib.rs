#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// `RwLock` and `LazyLock` for the shared registry.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod member;
pub mod meta;
pub mod property;
pub mod registry;
pub mod table;
pub mod ty;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::RegistrationError;

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
