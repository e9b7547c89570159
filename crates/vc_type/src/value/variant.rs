use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::registry::TypeRegistry;
use crate::ty::Type;

// -----------------------------------------------------------------------------
// Variant

/// A boxed value or a borrowed view of one.
///
/// The shape matters to property setters:
///
/// - `Ref` / `RefMut` are reference wrappers, binding without a copy.
/// - `Ptr` / `PtrMut` are pointers, the argument shape of pointer bound
///   properties.
/// - `Value` owns its content.
///
/// Moving out of a `RefMut` or `PtrMut` leaves `Default::default()` behind,
/// moving out of a `Value` leaves the variant `Empty`.
#[derive(Default)]
pub enum Variant<'a> {
    #[default]
    Empty,
    Value(Box<dyn Any>),
    Ref(&'a dyn Any),
    RefMut(&'a mut dyn Any),
    Ptr(&'a dyn Any),
    PtrMut(&'a mut dyn Any),
}

impl<'a> Variant<'a> {
    /// Boxes `value`.
    #[inline]
    pub fn new<T: Any>(value: T) -> Self {
        Self::Value(Box::new(value))
    }

    /// A reference wrapper to a const value.
    #[inline]
    pub fn from_ref<T: Any>(value: &'a T) -> Self {
        Self::Ref(value)
    }

    /// A reference wrapper to a mutable value.
    #[inline]
    pub fn from_mut<T: Any>(value: &'a mut T) -> Self {
        Self::RefMut(value)
    }

    /// A const pointer.
    #[inline]
    pub fn from_ptr<T: Any>(value: &'a T) -> Self {
        Self::Ptr(value)
    }

    /// A mutable pointer.
    #[inline]
    pub fn from_ptr_mut<T: Any>(value: &'a mut T) -> Self {
        Self::PtrMut(value)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    #[inline]
    pub fn is_ref_wrapper(&self) -> bool {
        matches!(self, Self::Ref(_) | Self::RefMut(_))
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Ptr(_) | Self::PtrMut(_))
    }

    /// The value held or referenced.
    pub fn held(&self) -> Option<&dyn Any> {
        match self {
            Self::Empty => None,
            Self::Value(boxed) => Some(&**boxed),
            Self::Ref(value) | Self::Ptr(value) => Some(*value),
            Self::RefMut(value) | Self::PtrMut(value) => Some(&**value),
        }
    }

    /// The held value, mutably. `Ref` and `Ptr` are const views.
    pub fn held_mut(&mut self) -> Option<&mut dyn Any> {
        match self {
            Self::Value(boxed) => Some(&mut **boxed),
            Self::RefMut(value) | Self::PtrMut(value) => Some(&mut **value),
            Self::Empty | Self::Ref(_) | Self::Ptr(_) => None,
        }
    }

    /// The [`TypeId`] of the held value.
    #[inline]
    pub fn held_type_id(&self) -> Option<TypeId> {
        self.held().map(|v| v.type_id())
    }

    /// The registered type of the held value, or [`Type::INVALID`].
    pub fn held_type(&self, registry: &TypeRegistry) -> Type {
        self.held_type_id()
            .and_then(|id| registry.get_by_type_id(id))
            .unwrap_or(Type::INVALID)
    }

    /// Returns `true` if the held value is a `T`, whatever the shape.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.held().is_some_and(|v| v.is::<T>())
    }

    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.held()?.downcast_ref::<T>()
    }

    #[inline]
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.held_mut()?.downcast_mut::<T>()
    }

    /// Takes an owned `T` out of a `Value`, leaving `Empty`.
    ///
    /// Other shapes and other types are left untouched.
    pub fn take<T: Any>(&mut self) -> Option<T> {
        match self {
            Self::Value(boxed) if boxed.is::<T>() => {}
            _ => return None,
        }
        match core::mem::take(self) {
            Self::Value(boxed) => boxed.downcast::<T>().ok().map(|v| *v),
            _ => None,
        }
    }

    /// Converts the held value to `T`.
    ///
    /// A held `T` is cloned, anything else goes through the converter
    /// registered for `(held type, T)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_type::registry::TypeRegistry;
    /// use vc_type::table::TypeConverter;
    /// use vc_type::value::Variant;
    ///
    /// let mut registry = TypeRegistry::new();
    /// let to_i64 = TypeConverter::new::<i32, i64>(&mut registry, |v| Some(i64::from(*v)));
    /// assert!(registry.register_converter(to_i64));
    ///
    /// let value = Variant::new(7_i32);
    /// assert_eq!(value.convert::<i64>(&registry), Some(7));
    /// assert_eq!(value.convert::<u8>(&registry), None);
    /// ```
    pub fn convert<T: Any + Clone>(&self, registry: &TypeRegistry) -> Option<T> {
        let held = self.held()?;
        if let Some(value) = held.downcast_ref::<T>() {
            return Some(value.clone());
        }
        let source = registry.get_by_type_id(held.type_id())?;
        let target = registry.get_by_type_id(TypeId::of::<T>())?;
        let converted = registry.get_type_converter(source, target)?.convert(held)?;
        converted.downcast::<T>().ok().map(|v| *v)
    }

    /// Compares through the registered equal comparator of the held type.
    ///
    /// Returns `false` for different held types or a missing comparator.
    pub fn equals(&self, other: &Variant<'_>, registry: &TypeRegistry) -> bool {
        let (Some(lhs), Some(rhs)) = (self.held(), other.held()) else {
            return false;
        };
        let ty = self.held_type(registry);
        match registry.get_equal_comparator(ty) {
            Some(comparator) => comparator.compare(lhs, rhs),
            None => false,
        }
    }

    /// Orders through the registered less-than comparator of the held type.
    pub fn less_than(&self, other: &Variant<'_>, registry: &TypeRegistry) -> bool {
        let (Some(lhs), Some(rhs)) = (self.held(), other.held()) else {
            return false;
        };
        let ty = self.held_type(registry);
        match registry.get_less_than_comparator(ty) {
            Some(comparator) => comparator.compare(lhs, rhs),
            None => false,
        }
    }
}

impl fmt::Debug for Variant<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Empty => "Empty",
            Self::Value(_) => "Value",
            Self::Ref(_) => "Ref",
            Self::RefMut(_) => "RefMut",
            Self::Ptr(_) => "Ptr",
            Self::PtrMut(_) => "PtrMut",
        };
        write!(f, "Variant::{shape}")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Variant;
    use crate::registry::TypeRegistry;
    use crate::table::TypeComparator;

    #[test]
    fn shapes() {
        let mut text = String::from("abc");
        assert!(Variant::new(1_u8).is::<u8>());
        assert!(Variant::from_ref(&text).is_ref_wrapper());
        assert!(Variant::from_ptr(&text).is_pointer());

        let mut wrapper = Variant::from_mut(&mut text);
        if let Some(s) = wrapper.get_mut::<String>() {
            s.push('d');
        }
        assert_eq!(text, "abcd");
        assert!(Variant::Empty.held().is_none());
    }

    #[test]
    fn take_leaves_empty() {
        let mut value = Variant::new(String::from("x"));
        assert_eq!(value.take::<u8>(), None);
        assert!(value.is_valid());
        assert_eq!(value.take::<String>().as_deref(), Some("x"));
        assert!(value.is_empty());
    }

    #[test]
    fn comparators() {
        let mut registry = TypeRegistry::new();
        let eq = TypeComparator::equal::<u32>(&mut registry);
        let lt = TypeComparator::less_than::<u32>(&mut registry);
        assert!(registry.register_equal_comparator(eq));
        assert!(registry.register_less_than_comparator(lt));

        let a = Variant::new(3_u32);
        let b = 3_u32;
        assert!(a.equals(&Variant::from_ref(&b), &registry));
        assert!(!a.less_than(&Variant::new(3_u32), &registry));
        assert!(a.less_than(&Variant::new(4_u32), &registry));
        assert!(!a.equals(&Variant::new(3_i64), &registry));
    }
}
