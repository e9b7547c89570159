use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::member::{Constructor, Destructor, Enumeration, Method};
use crate::property::Property;
use crate::registry::{TypeRegistry, TypeRegistryArc};
use crate::table::{TypeComparator, TypeConverter};
use crate::ty::{BaseClass, Type, TypeDraft, Typed};

fn with_registry<R>(
    registry: &Weak<RwLock<TypeRegistry>>,
    f: impl FnOnce(&mut TypeRegistry) -> R,
) -> Option<R> {
    let registry = registry.upgrade()?;
    let mut guard = registry.write().unwrap_or_else(PoisonError::into_inner);
    Some(f(&mut guard))
}

// -----------------------------------------------------------------------------
// RegistrationManager

/// Records a group of registrations and undoes them when dropped.
///
/// Once the registry shuts down, or [`disable_unregister`] is called, the
/// drop leaves everything in place. A manager never keeps its registry
/// alive.
///
/// # Examples
///
/// ```
/// use vc_type::registry::{RegistrationManager, TypeRegistry, TypeRegistryArc};
///
/// let registry = TypeRegistryArc::new(TypeRegistry::empty());
/// {
///     let mut manager = RegistrationManager::new(&registry);
///     manager.register::<Vec<u8>>();
///     assert!(registry.read().get::<Vec<u8>>().is_some());
/// }
/// assert!(registry.read().get::<Vec<u8>>().is_none());
/// ```
///
/// [`disable_unregister`]: RegistrationManager::disable_unregister
pub struct RegistrationManager {
    registry: Weak<RwLock<TypeRegistry>>,
    disabled: Arc<AtomicBool>,
    types: Vec<Type>,
    base_classes: Vec<Type>,
    properties: Vec<(Type, Property)>,
    global_properties: Vec<Property>,
    methods: Vec<(Type, Method)>,
    global_methods: Vec<Method>,
    constructors: Vec<(Type, Constructor)>,
    destructors: Vec<Type>,
    enumerations: Vec<Type>,
    converters: Vec<(Type, Type)>,
    equal_comparators: Vec<Type>,
    less_than_comparators: Vec<Type>,
}

impl RegistrationManager {
    pub fn new(registry: &TypeRegistryArc) -> Self {
        let disabled = Arc::new(AtomicBool::new(false));
        registry.write().add_shutdown_hook(disabled.clone());
        Self {
            registry: registry.downgrade(),
            disabled,
            types: Vec::new(),
            base_classes: Vec::new(),
            properties: Vec::new(),
            global_properties: Vec::new(),
            methods: Vec::new(),
            global_methods: Vec::new(),
            constructors: Vec::new(),
            destructors: Vec::new(),
            enumerations: Vec::new(),
            converters: Vec::new(),
            equal_comparators: Vec::new(),
            less_than_comparators: Vec::new(),
        }
    }

    /// Keeps every registration in place when the manager drops.
    #[inline]
    pub fn disable_unregister(&self) {
        self.disabled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_unregister_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }

    /// Registers `T`. Every type that was not registered before, `T` and
    /// its dependencies, is recorded.
    pub fn register<T: Typed>(&mut self) -> Type {
        let added = with_registry(&self.registry, |registry| {
            let before = registry.live.len();
            let ty = registry.register::<T>();
            (ty, registry.live[before..].to_vec())
        });
        match added {
            Some((ty, added)) => {
                self.types.extend(added);
                ty
            }
            None => Type::INVALID,
        }
    }

    pub fn register_type(&mut self, draft: TypeDraft) -> (Type, bool) {
        let added = with_registry(&self.registry, |registry| {
            let before = registry.live.len();
            let result = registry.register_type(draft);
            (result, registry.live[before..].to_vec())
        });
        match added {
            Some((result, added)) => {
                self.types.extend(added);
                result
            }
            None => (Type::INVALID, false),
        }
    }

    pub fn register_base_class(&mut self, derived: Type, base: BaseClass) -> bool {
        let base_ty = base.ty();
        let added = with_registry(&self.registry, |r| r.register_base_class(derived, base))
            .unwrap_or(false);
        if added {
            self.base_classes.push(derived);
            self.base_classes.push(base_ty);
        }
        added
    }

    pub fn register_property(&mut self, ty: Type, property: Property) -> bool {
        let added = with_registry(&self.registry, |r| r.register_property(ty, property.clone()))
            .unwrap_or(false);
        if added {
            self.properties.push((ty, property));
        }
        added
    }

    pub fn register_global_property(&mut self, property: Property) -> bool {
        let added = with_registry(&self.registry, |r| {
            r.register_global_property(property.clone())
        })
        .unwrap_or(false);
        if added {
            self.global_properties.push(property);
        }
        added
    }

    pub fn register_method(&mut self, ty: Type, method: Method) -> bool {
        let added = with_registry(&self.registry, |r| r.register_method(ty, method.clone()))
            .unwrap_or(false);
        if added {
            self.methods.push((ty, method));
        }
        added
    }

    pub fn register_global_method(&mut self, method: Method) -> bool {
        let added = with_registry(&self.registry, |r| r.register_global_method(method.clone()))
            .unwrap_or(false);
        if added {
            self.global_methods.push(method);
        }
        added
    }

    pub fn register_constructor(&mut self, ty: Type, constructor: Constructor) -> bool {
        let added = with_registry(&self.registry, |r| {
            r.register_constructor(ty, constructor.clone())
        })
        .unwrap_or(false);
        if added {
            self.constructors.push((ty, constructor));
        }
        added
    }

    pub fn register_destructor(&mut self, ty: Type, destructor: Destructor) -> bool {
        let added = with_registry(&self.registry, |r| r.register_destructor(ty, destructor))
            .unwrap_or(false);
        if added {
            self.destructors.push(ty);
        }
        added
    }

    pub fn register_enumeration(&mut self, ty: Type, enumeration: Enumeration) -> bool {
        let added = with_registry(&self.registry, |r| r.register_enumeration(ty, enumeration))
            .unwrap_or(false);
        if added {
            self.enumerations.push(ty);
        }
        added
    }

    pub fn register_converter(&mut self, converter: TypeConverter) -> bool {
        let key = (converter.source(), converter.target());
        let added = with_registry(&self.registry, |r| r.register_converter(converter))
            .unwrap_or(false);
        if added {
            self.converters.push(key);
        }
        added
    }

    pub fn register_equal_comparator(&mut self, comparator: TypeComparator) -> bool {
        let ty = comparator.ty();
        let added = with_registry(&self.registry, |r| r.register_equal_comparator(comparator))
            .unwrap_or(false);
        if added {
            self.equal_comparators.push(ty);
        }
        added
    }

    pub fn register_less_than_comparator(&mut self, comparator: TypeComparator) -> bool {
        let ty = comparator.ty();
        let added = with_registry(&self.registry, |r| {
            r.register_less_than_comparator(comparator)
        })
        .unwrap_or(false);
        if added {
            self.less_than_comparators.push(ty);
        }
        added
    }

    fn unregister_all(&mut self, registry: &mut TypeRegistry) {
        for ty in self.less_than_comparators.drain(..) {
            registry.unregister_less_than_comparator(ty);
        }
        for ty in self.equal_comparators.drain(..) {
            registry.unregister_equal_comparator(ty);
        }
        for (source, target) in self.converters.drain(..) {
            registry.unregister_converter(source, target);
        }
        for method in self.global_methods.drain(..) {
            registry.unregister_global_method(&method);
        }
        for property in self.global_properties.drain(..) {
            registry.unregister_global_property(&property);
        }
        for (ty, method) in self.methods.drain(..) {
            registry.unregister_method(ty, &method);
        }
        for (ty, property) in self.properties.drain(..) {
            registry.unregister_property(ty, &property);
        }
        for (ty, constructor) in self.constructors.drain(..) {
            registry.unregister_constructor(ty, &constructor);
        }
        for ty in self.destructors.drain(..) {
            registry.unregister_destructor(ty);
        }
        for ty in self.enumerations.drain(..) {
            registry.unregister_enumeration(ty);
        }
        while let [.., derived, base] = self.base_classes[..] {
            self.base_classes.truncate(self.base_classes.len() - 2);
            registry.unregister_base_class(derived, base);
        }
        for ty in self.types.drain(..).rev() {
            registry.unregister_type(ty);
        }
    }
}

impl Drop for RegistrationManager {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.remove_shutdown_hook(&self.disabled);
        if self.is_unregister_disabled() {
            return;
        }
        log::debug!("unregistering {} types of a registration manager", self.types.len());
        self.unregister_all(&mut registry);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::member::Method;
    use crate::property::{FieldStorage, PropertyBuilder};
    use crate::registry::{RegistrationManager, TypeRegistry, TypeRegistryArc};
    use crate::table::TypeComparator;
    use crate::ty::{BaseClass, TypeDraft, TypeTraits, Typed};
    use crate::value::Variant;

    #[derive(Default)]
    struct Engine {
        power: u32,
    }

    #[derive(Default)]
    struct Turbo {
        engine: Engine,
    }

    impl Typed for Engine {
        fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
        }
    }

    impl Typed for Turbo {
        fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
        }
    }

    fn power(e: &Engine) -> &u32 {
        &e.power
    }

    fn power_mut(e: &mut Engine) -> &mut u32 {
        &mut e.power
    }

    fn engine(t: &Turbo) -> &Engine {
        &t.engine
    }

    fn engine_mut(t: &mut Turbo) -> &mut Engine {
        &mut t.engine
    }

    #[test]
    fn drop_undoes_every_registration() {
        let registry = TypeRegistryArc::new(TypeRegistry::new());
        let before = registry.read().types().len();
        {
            let mut manager = RegistrationManager::new(&registry);
            let engine_ty = manager.register::<Engine>();
            let turbo_ty = manager.register::<Turbo>();

            let edge = BaseClass::new::<Turbo, Engine>(&mut registry.write(), engine, engine_mut);
            assert!(manager.register_base_class(turbo_ty, edge));

            let storage = FieldStorage::<Engine, u32>::new(power, power_mut);
            let property = PropertyBuilder::new("power", storage)
                .build(&mut registry.write())
                .unwrap();
            assert!(manager.register_property(engine_ty, property));

            let start = Method::builder("start", |_, _, _| Variant::Empty)
                .declaring_type(engine_ty)
                .build();
            assert!(manager.register_method(engine_ty, start));

            let eq = TypeComparator::equal::<u32>(&mut registry.write());
            assert!(manager.register_equal_comparator(eq));

            let read = registry.read();
            assert_eq!(read.properties(turbo_ty).len(), 1);
            assert!(read.is_derived_from(turbo_ty, engine_ty));
        }

        let read = registry.read();
        assert_eq!(read.types().len(), before);
        assert!(read.get::<Engine>().is_none());
        assert!(read.get::<Turbo>().is_none());
        let int = read.get::<u32>().unwrap();
        assert!(read.get_equal_comparator(int).is_none());
    }

    #[test]
    fn disabled_or_shut_down_keeps_registrations() {
        let registry = TypeRegistryArc::new(TypeRegistry::new());
        {
            let mut manager = RegistrationManager::new(&registry);
            manager.register::<Engine>();
            manager.disable_unregister();
            assert!(manager.is_unregister_disabled());
        }
        assert!(registry.read().get::<Engine>().is_some());

        {
            let mut manager = RegistrationManager::new(&registry);
            manager.register::<Turbo>();
            registry.write().shutdown();
            assert!(manager.is_unregister_disabled());
        }
        assert!(registry.read().get::<Turbo>().is_some());
    }

    #[test]
    fn registry_may_go_first() {
        let registry = TypeRegistryArc::new(TypeRegistry::new());
        let mut manager = RegistrationManager::new(&registry);
        manager.register::<Vec<Engine>>();
        drop(registry);
        assert!(manager.is_unregister_disabled());
        assert!(manager.register::<Turbo>().is_sentinel());
    }
}
