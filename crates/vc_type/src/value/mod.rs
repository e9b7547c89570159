//! Boxed values and instances passed through properties and methods.

// -----------------------------------------------------------------------------
// Modules

mod instance;
mod variant;

// -----------------------------------------------------------------------------
// Exports

pub use instance::Instance;
pub use variant::Variant;
