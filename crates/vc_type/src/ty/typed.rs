use core::any::Any;

use crate::registry::TypeRegistry;
use crate::ty::TypeDraft;

/// A Rust type the registry can describe.
///
/// `type_draft` is called once, the first time the type is requested from a
/// registry. It may register the types it depends on through `registry`
/// (element types, wrapped types, base classes).
///
/// # Examples
///
/// ```
/// use vc_type::registry::TypeRegistry;
/// use vc_type::ty::{TypeDraft, TypeTraits, Typed};
///
/// #[derive(Clone, Default)]
/// struct Point { x: f32, y: f32 }
///
/// impl Typed for Point {
///     fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
///         TypeDraft::of_clone::<Self>().traits(TypeTraits::CLASS)
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// let point = registry.register::<Point>();
/// assert!(registry.record(point).is_class());
/// assert_eq!(registry.get::<Point>(), Some(point));
/// ```
pub trait Typed: Any {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft;
}
