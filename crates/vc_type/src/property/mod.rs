//! The property accessor family.
//!
//! A property is one [`PropertyWrapper`] composed of a [`Storage`] strategy,
//! telling where the value lives, and a [`BindPolicy`], telling how it is
//! exposed through a [`Variant`]. Everything is reached through the erased
//! [`Property`] handle.
//!
//! # Examples
//!
//! ```
//! use vc_type::property::{BindPolicy, FieldStorage, PropertyBuilder};
//! use vc_type::registry::TypeRegistry;
//! use vc_type::ty::{TypeDraft, TypeTraits, Typed};
//! use vc_type::value::{Instance, Variant};
//!
//! #[derive(Default)]
//! struct Point { x: f32 }
//!
//! impl Typed for Point {
//!     fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
//!         TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
//!     }
//! }
//!
//! fn x(p: &Point) -> &f32 { &p.x }
//! fn x_mut(p: &mut Point) -> &mut f32 { &mut p.x }
//!
//! let mut registry = TypeRegistry::new();
//! let storage = FieldStorage::<Point, f32>::new(x, x_mut);
//! let property = PropertyBuilder::new("x", storage)
//!     .policy(BindPolicy::AsCopy)
//!     .build(&mut registry)
//!     .unwrap();
//!
//! let mut point = Point::default();
//! let mut arg = Variant::new(2.5_f32);
//! assert!(property.set_value(&registry, Instance::from_mut(&mut point), &mut arg));
//! let value = property.get_value(&registry, Instance::from_ref(&point));
//! assert_eq!(value.get::<f32>(), Some(&2.5));
//! ```
//!
//! [`Variant`]: crate::value::Variant

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod property;
mod storage;
mod visit;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub use builder::PropertyBuilder;
pub use property::{Property, PropertyAccessor};
pub use storage::{Assign, FieldStorage, FunctionStorage, MethodStorage, Storage};
pub use visit::{PropertyInfo, VisitorAdapter};
pub use wrapper::PropertyWrapper;

// -----------------------------------------------------------------------------
// BindPolicy

/// How a property exposes its value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BindPolicy {
    /// Reads box a copy, the logical type is the value type `A`.
    #[default]
    AsCopy,
    /// Reads return a pointer, the logical type is `*const A` or `*mut A`.
    ///
    /// Writes accept pointer arguments only and are skipped when the pointee
    /// equals the current value.
    AsPtr,
    /// Reads return a reference wrapper, the logical type is `&A` or `&mut A`.
    AsRefWrapper,
}

