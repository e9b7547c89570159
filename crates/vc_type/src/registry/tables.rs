use crate::registry::TypeRegistry;
use crate::table::{TypeComparator, TypeConverter};
use crate::ty::Type;

// -----------------------------------------------------------------------------
// Conversion and comparison

impl TypeRegistry {
    /// Fails if a converter for the same source and target exists.
    pub fn register_converter(&mut self, converter: TypeConverter) -> bool {
        let (source, target) = (converter.source(), converter.target());
        if self.get_type_converter(source, target).is_some() {
            log::warn!("converter {source:?} -> {target:?} is already registered");
            return false;
        }
        self.converters.insert(source, converter);
        true
    }

    pub fn unregister_converter(&mut self, source: Type, target: Type) -> bool {
        self.converters.remove(source, |c| c.target() == target)
    }

    /// Every converter, grouped by source type.
    #[inline]
    pub fn converters(&self) -> impl Iterator<Item = &TypeConverter> {
        self.converters.iter()
    }

    #[inline]
    pub fn get_type_converter(&self, source: Type, target: Type) -> Option<&TypeConverter> {
        self.converters.find(source, |c| c.target() == target)
    }

    pub fn register_equal_comparator(&mut self, comparator: TypeComparator) -> bool {
        let ty = comparator.ty();
        if self.get_equal_comparator(ty).is_some() {
            log::warn!("equal comparator of {ty:?} is already registered");
            return false;
        }
        self.equal_comparators.insert(ty, comparator);
        true
    }

    pub fn unregister_equal_comparator(&mut self, ty: Type) -> bool {
        self.equal_comparators.remove(ty, |_| true)
    }

    #[inline]
    pub fn get_equal_comparator(&self, ty: Type) -> Option<&TypeComparator> {
        self.equal_comparators.find(ty, |_| true)
    }

    pub fn register_less_than_comparator(&mut self, comparator: TypeComparator) -> bool {
        let ty = comparator.ty();
        if self.get_less_than_comparator(ty).is_some() {
            log::warn!("less-than comparator of {ty:?} is already registered");
            return false;
        }
        self.less_than_comparators.insert(ty, comparator);
        true
    }

    pub fn unregister_less_than_comparator(&mut self, ty: Type) -> bool {
        self.less_than_comparators.remove(ty, |_| true)
    }

    #[inline]
    pub fn get_less_than_comparator(&self, ty: Type) -> Option<&TypeComparator> {
        self.less_than_comparators.find(ty, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::TypeRegistry;
    use crate::table::{TypeComparator, TypeConverter};

    #[test]
    fn converters_are_unique_per_pair() {
        let mut registry = TypeRegistry::new();
        let narrow = TypeConverter::new::<i64, i32>(&mut registry, |v| i32::try_from(*v).ok());
        let again = TypeConverter::new::<i64, i32>(&mut registry, |_| None);
        let widen = TypeConverter::new::<i64, i128>(&mut registry, |v| Some(i128::from(*v)));
        let (source, target) = (narrow.source(), narrow.target());

        assert!(registry.register_converter(narrow));
        assert!(!registry.register_converter(again));
        assert!(registry.register_converter(widen));
        assert_eq!(registry.converters().count(), 2);

        let converter = registry.get_type_converter(source, target).unwrap();
        let converted = converter.convert(&7_i64).and_then(|v| v.downcast::<i32>().ok());
        assert_eq!(converted.map(|v| *v), Some(7));
        assert!(converter.convert(&i64::MAX).is_none());

        assert!(registry.unregister_converter(source, target));
        assert!(!registry.unregister_converter(source, target));
        assert!(registry.get_type_converter(source, target).is_none());
    }

    #[test]
    fn comparators_are_unique_per_type() {
        let mut registry = TypeRegistry::new();
        let eq = TypeComparator::equal::<u16>(&mut registry);
        let ty = eq.ty();
        assert!(registry.register_equal_comparator(eq));
        assert!(!registry.register_equal_comparator(TypeComparator::from_fn(ty, |_, _| true)));
        assert!(registry.get_equal_comparator(ty).is_some_and(|c| c.compare(&1_u16, &1_u16)));

        let lt = TypeComparator::less_than::<u16>(&mut registry);
        assert!(registry.register_less_than_comparator(lt));
        assert!(registry.get_less_than_comparator(ty).is_some_and(|c| c.compare(&1_u16, &2_u16)));

        assert!(registry.unregister_equal_comparator(ty));
        assert!(registry.unregister_less_than_comparator(ty));
        assert!(registry.get_equal_comparator(ty).is_none());
    }

    #[test]
    fn unregistering_a_type_drops_its_tables() {
        let mut registry = TypeRegistry::new();
        let to_byte = TypeConverter::new::<u64, u8>(&mut registry, |v| u8::try_from(*v).ok());
        let source = to_byte.source();
        assert!(registry.register_converter(to_byte));
        let eq = TypeComparator::equal::<u64>(&mut registry);
        assert!(registry.register_equal_comparator(eq));

        assert!(registry.unregister_type(source));
        assert_eq!(registry.converters().count(), 0);
        assert!(registry.get_equal_comparator(source).is_none());
    }
}
