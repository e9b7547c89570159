//! The type registry.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: the owning context. Slots, name indexes, class
//!   members, global members and the conversion tables.
//! - [`TypeRegistryArc`]: a shared, lock-protected registry with the
//!   process-wide [`TypeRegistryArc::global`] instance.
//! - [`RegistrationManager`]: undoes a group of registrations when dropped.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration, not all
//! platforms support it (although major platforms do). Registration
//! functions are submitted with [`auto_register!`](crate::auto_register).

// -----------------------------------------------------------------------------
// Modules

mod arc;
mod auto;
mod class;
mod global;
mod manager;
mod tables;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use arc::TypeRegistryArc;
pub use manager::RegistrationManager;
pub use type_registry::TypeRegistry;

#[cfg(feature = "auto_register")]
pub use auto::AutoRegisterFunc;

