use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use std::collections::HashMap;

use crate::registry::TypeRegistry;
use crate::ty::{TemplateArgument, Type, TypeDraft, TypeTraits, Typed};
use crate::value::Variant;

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_arithmetic {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
                    TypeDraft::of_clone::<$ty>().traits(TypeTraits::ARITHMETIC)
                }
            }
        )*
    };
}

impl_arithmetic!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl Typed for () {
    fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
        TypeDraft::of_clone::<()>()
    }
}

impl Typed for String {
    fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
        TypeDraft::of_clone::<String>().traits(TypeTraits::CLASS)
    }
}

impl Typed for &'static str {
    fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
        TypeDraft::of_clone::<&'static str>()
    }
}

// -----------------------------------------------------------------------------
// Pointers and references

fn pointer_draft<P: Any, T: Typed>(registry: &mut TypeRegistry) -> TypeDraft {
    let pointee = registry.register::<T>();
    let record = registry.record(pointee);
    let dimension = record.pointer_dimension() + 1;
    let raw = record.raw_type();

    TypeDraft::of::<P>()
        .traits(TypeTraits::POINTER)
        .pointer_dimension(dimension)
        .raw_type(raw)
}

impl<T: Typed> Typed for *const T {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        pointer_draft::<Self, T>(registry)
    }
}

impl<T: Typed> Typed for *mut T {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        pointer_draft::<Self, T>(registry)
    }
}

// `&'static T` and `&'static mut T` stand for the reference-wrapper
// form of `T`: they wrap `T` and strip down to the same raw type.
fn reference_draft<R: Any, T: Typed>(registry: &mut TypeRegistry) -> TypeDraft {
    let referent = registry.register::<T>();
    let raw = registry.record(referent).raw_type();

    TypeDraft::of::<R>().wrapped_type(referent).raw_type(raw)
}

impl<T: Typed> Typed for &'static T {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        reference_draft::<Self, T>(registry)
    }
}

impl<T: Typed> Typed for &'static mut T {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        reference_draft::<Self, T>(registry)
    }
}

// -----------------------------------------------------------------------------
// Arrays

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        let element = registry.register::<T>();
        let record = registry.record(element);
        // Nested arrays link the innermost element.
        let element = if record.is_array() {
            record.array_element_type()
        } else {
            record.raw_type()
        };

        TypeDraft::of::<Self>()
            .traits(TypeTraits::ARRAY)
            .array_element_type(element)
    }
}

// -----------------------------------------------------------------------------
// Containers

fn sequential_draft<C: Any, T: Typed>(registry: &mut TypeRegistry) -> TypeDraft {
    let value = registry.register::<T>();
    TypeDraft::of::<C>()
        .traits(TypeTraits::CLASS | TypeTraits::SEQUENTIAL_CONTAINER)
        .container(Type::INVALID, value)
        .template_argument(TemplateArgument::ty(value))
}

fn associative_draft<C: Any, K: Typed, V: Typed>(registry: &mut TypeRegistry) -> TypeDraft {
    let key = registry.register::<K>();
    let value = registry.register::<V>();
    TypeDraft::of::<C>()
        .traits(TypeTraits::CLASS | TypeTraits::ASSOCIATIVE_CONTAINER)
        .container(key, value)
        .template_argument(TemplateArgument::ty(key))
        .template_argument(TemplateArgument::ty(value))
}

impl<T: Typed> Typed for Vec<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        sequential_draft::<Self, T>(registry)
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        sequential_draft::<Self, T>(registry)
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        let key = registry.register::<T>();
        TypeDraft::of::<Self>()
            .traits(TypeTraits::CLASS | TypeTraits::ASSOCIATIVE_CONTAINER)
            .container(key, Type::INVALID)
            .template_argument(TemplateArgument::ty(key))
    }
}

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        associative_draft::<Self, K, V>(registry)
    }
}

impl<K: Typed, V: Typed> Typed for HashMap<K, V> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        associative_draft::<Self, K, V>(registry)
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        let inner = registry.register::<T>();
        TypeDraft::of::<Self>()
            .traits(TypeTraits::CLASS)
            .template_argument(TemplateArgument::ty(inner))
    }
}

// -----------------------------------------------------------------------------
// Wrappers

fn wrap_in_box<T: Any + Clone>(value: &dyn Any) -> Variant<'static> {
    match value.downcast_ref::<T>() {
        Some(v) => Variant::new(Box::new(v.clone())),
        None => Variant::Empty,
    }
}

fn wrap_in_arc<T: Any + Clone>(value: &dyn Any) -> Variant<'static> {
    match value.downcast_ref::<T>() {
        Some(v) => Variant::new(Arc::new(v.clone())),
        None => Variant::Empty,
    }
}

impl<T: Typed + Clone> Typed for Box<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        let inner = registry.register::<T>();
        TypeDraft::of_clone::<Self>()
            .traits(TypeTraits::CLASS)
            .wrapped_type(inner)
            .template_argument(TemplateArgument::ty(inner))
            .create_wrapper(wrap_in_box::<T>)
    }
}

impl<T: Typed + Clone> Typed for Arc<T> {
    fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
        let inner = registry.register::<T>();
        TypeDraft::of_clone::<Self>()
            .traits(TypeTraits::CLASS)
            .wrapped_type(inner)
            .template_argument(TemplateArgument::ty(inner))
            .create_wrapper(wrap_in_arc::<T>)
    }
}

// -----------------------------------------------------------------------------
// Function pointers

impl<R: Typed> Typed for fn() -> R {
    fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
        TypeDraft::of_clone::<Self>().traits(TypeTraits::FUNCTION_POINTER)
    }
}

impl<A: Typed, R: Typed> Typed for fn(A) -> R {
    fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
        TypeDraft::of_clone::<Self>().traits(TypeTraits::FUNCTION_POINTER)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::registry::TypeRegistry;

    #[test]
    fn pointer_links() {
        let mut registry = TypeRegistry::new();
        let int = registry.register::<i32>();
        let ptr = registry.register::<*const i32>();
        let ptr2 = registry.register::<*mut *const i32>();

        let record = registry.record(ptr2);
        assert!(record.is_pointer());
        assert_eq!(record.pointer_dimension(), 2);
        assert_eq!(record.raw_type(), int);
        assert_eq!(registry.record(ptr).raw_type(), int);
        assert_eq!(registry.record(int).raw_type(), int);
    }

    #[test]
    fn array_links_innermost_element() {
        let mut registry = TypeRegistry::new();
        let byte = registry.register::<u8>();
        let grid = registry.register::<[[u8; 2]; 3]>();

        assert!(registry.record(grid).is_array());
        assert_eq!(registry.record(grid).array_element_type(), byte);
        assert_eq!(registry.record(grid).size(), 6);
    }

    #[test]
    fn containers() {
        let mut registry = TypeRegistry::new();
        let list = registry.register::<Vec<String>>();
        let map = registry.register::<std::collections::HashMap<u32, String>>();
        let string = registry.register::<String>();
        let int = registry.register::<u32>();

        assert!(registry.record(list).is_sequential_container());
        assert_eq!(registry.record(list).value_type(), string);
        assert!(registry.record(map).is_associative_container());
        assert_eq!(registry.record(map).key_type(), int);
        assert_eq!(registry.record(map).template_arguments().len(), 2);
    }

    #[test]
    fn wrappers() {
        let mut registry = TypeRegistry::new();
        let boxed = registry.register::<alloc::boxed::Box<u16>>();
        let reference = registry.register::<&'static u16>();
        let int = registry.register::<u16>();

        assert!(registry.record(boxed).is_wrapper());
        assert_eq!(registry.record(boxed).wrapped_type(), int);
        assert_eq!(registry.record(reference).wrapped_type(), int);

        let wrapped = registry.create_wrapper(boxed, &9_u16);
        assert_eq!(wrapped.get::<alloc::boxed::Box<u16>>().map(|b| **b), Some(9));
    }
}
