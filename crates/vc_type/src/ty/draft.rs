use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::registry::TypeRegistry;
use crate::ty::{Type, TypeTraits, Typed};
use crate::value::Variant;

// -----------------------------------------------------------------------------
// CreateFn

/// Builds an owned [`Variant`] from a borrowed value of the slot's type.
///
/// Used both for "box a copy of this value" and for "wrap this value into
/// the wrapper type" (`Box<T>`, `Arc<T>`).
pub type CreateFn = fn(&dyn Any) -> Variant<'static>;

fn clone_into_variant<T: Any + Clone>(value: &dyn Any) -> Variant<'static> {
    match value.downcast_ref::<T>() {
        Some(v) => Variant::new(v.clone()),
        None => Variant::Empty,
    }
}

// -----------------------------------------------------------------------------
// Upcast

/// Adjusts an erased derived object to one of its bases.
///
/// Each base edge carries its own implementation, so casting never relies
/// on the layout of the derived type.
pub trait Upcast: Send + Sync + 'static {
    fn upcast<'a>(&self, obj: &'a dyn Any) -> Option<&'a dyn Any>;

    fn upcast_mut<'a>(&self, obj: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct UpcastFn<D, B> {
    up: fn(&D) -> &B,
    up_mut: fn(&mut D) -> &mut B,
}

impl<D: Any, B: Any> Upcast for UpcastFn<D, B> {
    fn upcast<'a>(&self, obj: &'a dyn Any) -> Option<&'a dyn Any> {
        let derived = obj.downcast_ref::<D>()?;
        Some((self.up)(derived))
    }

    fn upcast_mut<'a>(&self, obj: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let derived = obj.downcast_mut::<D>()?;
        Some((self.up_mut)(derived))
    }
}

// -----------------------------------------------------------------------------
// BaseClass

/// "Derived derives from `ty`", with the functions reaching the base part.
#[derive(Clone)]
pub struct BaseClass {
    ty: Type,
    upcast: Arc<dyn Upcast>,
}

impl BaseClass {
    /// Describes `B` as a base of `D`, registering `B` if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_type::registry::TypeRegistry;
    /// use vc_type::ty::{BaseClass, TypeDraft, TypeTraits, Typed};
    ///
    /// struct Shape { id: u32 }
    /// struct Circle { shape: Shape, radius: f32 }
    ///
    /// impl Typed for Shape {
    ///     fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
    ///         TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
    ///     }
    /// }
    ///
    /// fn shape(c: &Circle) -> &Shape { &c.shape }
    /// fn shape_mut(c: &mut Circle) -> &mut Shape { &mut c.shape }
    ///
    /// impl Typed for Circle {
    ///     fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
    ///         TypeDraft::of::<Self>()
    ///             .traits(TypeTraits::CLASS)
    ///             .base(BaseClass::new::<Circle, Shape>(registry, shape, shape_mut))
    ///     }
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// let circle = registry.register::<Circle>();
    /// let shape = registry.register::<Shape>();
    /// assert!(registry.is_derived_from(circle, shape));
    /// ```
    pub fn new<D: Any, B: Typed>(
        registry: &mut TypeRegistry,
        up: fn(&D) -> &B,
        up_mut: fn(&mut D) -> &mut B,
    ) -> Self {
        Self {
            ty: registry.register::<B>(),
            upcast: Arc::new(UpcastFn { up, up_mut }),
        }
    }

    /// Builds an edge from an already known base and a custom [`Upcast`].
    #[inline]
    pub fn from_parts(ty: Type, upcast: Arc<dyn Upcast>) -> Self {
        Self { ty, upcast }
    }

    /// The base type.
    #[inline]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub fn upcast<'a>(&self, obj: &'a dyn Any) -> Option<&'a dyn Any> {
        self.upcast.upcast(obj)
    }

    #[inline]
    pub fn upcast_mut<'a>(&self, obj: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.upcast.upcast_mut(obj)
    }
}

impl fmt::Debug for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseClass").field(&self.ty).finish()
    }
}

// -----------------------------------------------------------------------------
// TemplateArgument

/// One argument of a generic instantiation.
///
/// Only arguments flagged as type parameters have their display name
/// substituted when a name is derived, const arguments are left as written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateArgument {
    pub ty: Type,
    pub is_type_param: bool,
}

impl TemplateArgument {
    /// A type parameter.
    #[inline]
    pub const fn ty(ty: Type) -> Self {
        Self {
            ty,
            is_type_param: true,
        }
    }

    /// A const parameter whose value has type `ty`.
    #[inline]
    pub const fn value(ty: Type) -> Self {
        Self {
            ty,
            is_type_param: false,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDraft

/// The description of a type, handed to [`TypeRegistry::register_type`].
///
/// Built with [`TypeDraft::of`] and refined by the builder methods.
pub struct TypeDraft {
    pub(crate) name: String,
    pub(crate) type_id: Option<TypeId>,
    pub(crate) size: usize,
    pub(crate) pointer_dimension: u32,
    pub(crate) traits: TypeTraits,
    pub(crate) raw_type: Option<Type>,
    pub(crate) wrapped_type: Type,
    pub(crate) array_element_type: Type,
    pub(crate) key_type: Type,
    pub(crate) value_type: Type,
    pub(crate) template_arguments: Vec<TemplateArgument>,
    pub(crate) base_classes: Vec<BaseClass>,
    pub(crate) create_variant: Option<CreateFn>,
    pub(crate) create_wrapper: Option<CreateFn>,
}

impl TypeDraft {
    /// A draft for `T` named by [`core::any::type_name`].
    pub fn of<T: Any>() -> Self {
        let mut draft = Self::named(core::any::type_name::<T>(), size_of::<T>());
        draft.type_id = Some(TypeId::of::<T>());
        draft
    }

    /// A draft for `T` able to box copies of its values.
    #[inline]
    pub fn of_clone<T: Any + Clone>() -> Self {
        Self::of::<T>().create_variant(clone_into_variant::<T>)
    }

    /// A draft not bound to a Rust type, identified by its name only.
    pub fn named(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            type_id: None,
            size,
            pointer_dimension: 0,
            traits: TypeTraits::empty(),
            raw_type: None,
            wrapped_type: Type::INVALID,
            array_element_type: Type::INVALID,
            key_type: Type::INVALID,
            value_type: Type::INVALID,
            template_arguments: Vec::new(),
            base_classes: Vec::new(),
            create_variant: None,
            create_wrapper: None,
        }
    }

    /// The canonical name of the draft.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn traits(mut self, traits: TypeTraits) -> Self {
        self.traits |= traits;
        self
    }

    #[inline]
    pub fn pointer_dimension(mut self, dimension: u32) -> Self {
        self.pointer_dimension = dimension;
        self
    }

    /// The type with pointers and references stripped. Defaults to itself.
    #[inline]
    pub fn raw_type(mut self, raw: Type) -> Self {
        self.raw_type = Some(raw);
        self
    }

    #[inline]
    pub fn wrapped_type(mut self, wrapped: Type) -> Self {
        self.wrapped_type = wrapped;
        self
    }

    #[inline]
    pub fn array_element_type(mut self, element: Type) -> Self {
        self.array_element_type = element;
        self
    }

    /// Key and value types of a container. Use [`Type::INVALID`] for no key.
    #[inline]
    pub fn container(mut self, key: Type, value: Type) -> Self {
        self.key_type = key;
        self.value_type = value;
        self
    }

    #[inline]
    pub fn template_argument(mut self, argument: TemplateArgument) -> Self {
        self.template_arguments.push(argument);
        self.traits |= TypeTraits::TEMPLATE_INSTANTIATION;
        self
    }

    #[inline]
    pub fn base(mut self, base: BaseClass) -> Self {
        self.base_classes.push(base);
        self
    }

    #[inline]
    pub fn create_variant(mut self, create: CreateFn) -> Self {
        self.create_variant = Some(create);
        self
    }

    #[inline]
    pub fn create_wrapper(mut self, create: CreateFn) -> Self {
        self.create_wrapper = Some(create);
        self
    }
}

impl fmt::Debug for TypeDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDraft")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("traits", &self.traits)
            .finish_non_exhaustive()
    }
}
