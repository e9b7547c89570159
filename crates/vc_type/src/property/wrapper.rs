use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::member::AccessLevel;
use crate::meta::{MetaValue, MetadataTable};
use crate::property::{
    Assign, BindPolicy, Property, PropertyAccessor, PropertyInfo, Storage, VisitorAdapter,
};
use crate::registry::TypeRegistry;
use crate::ty::Type;
use crate::value::{Instance, Variant};

// -----------------------------------------------------------------------------
// PropertyWrapper

/// The one property implementation: a storage strategy plus a bind policy.
///
/// Built by [`PropertyBuilder`](crate::property::PropertyBuilder).
pub struct PropertyWrapper<S: Storage> {
    pub(crate) name: String,
    pub(crate) declaring_type: Type,
    pub(crate) access: AccessLevel,
    pub(crate) policy: BindPolicy,
    pub(crate) readonly: bool,
    pub(crate) value_type: Type,
    pub(crate) raw_value_type: Type,
    pub(crate) storage: S,
    pub(crate) metadata: MetadataTable,
    pub(crate) visitors: Vec<VisitorAdapter>,
}

impl<S: Storage> PropertyWrapper<S> {
    #[inline]
    pub fn policy(&self) -> BindPolicy {
        self.policy
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads and writes through a mutable borrow.
    #[inline]
    fn is_mutable(&self) -> bool {
        !self.readonly && S::LENDS_MUT
    }

    /// `None` when the instance is not a `S::Class`.
    fn resolve<'a>(
        registry: &TypeRegistry,
        instance: Instance<'a>,
    ) -> Option<Option<&'a S::Class>> {
        if S::IS_STATIC {
            return Some(None);
        }
        instance.try_convert::<S::Class>(registry).map(Some)
    }

    fn resolve_mut<'a>(
        registry: &TypeRegistry,
        instance: Instance<'a>,
    ) -> Option<Option<&'a mut S::Class>> {
        if S::IS_STATIC {
            return Some(None);
        }
        instance.try_convert_mut::<S::Class>(registry).map(Some)
    }

    fn read<'a>(&self, registry: &TypeRegistry, instance: Instance<'a>) -> Variant<'a> {
        let Some(obj) = Self::resolve(registry, instance) else {
            return Variant::Empty;
        };
        match self.policy {
            BindPolicy::AsCopy => match self.storage.fetch(obj) {
                Some(value) => Variant::new(value),
                None => Variant::Empty,
            },
            BindPolicy::AsPtr => match self.storage.lend(obj) {
                Some(value) => Variant::Ptr(value),
                None => Variant::Empty,
            },
            BindPolicy::AsRefWrapper => match self.storage.lend(obj) {
                Some(value) => Variant::Ref(value),
                None => Variant::Empty,
            },
        }
    }

    fn read_mut<'a>(&self, registry: &TypeRegistry, instance: Instance<'a>) -> Variant<'a> {
        let Some(obj) = Self::resolve_mut(registry, instance) else {
            return Variant::Empty;
        };
        let Some(value) = self.storage.lend_mut(obj) else {
            return Variant::Empty;
        };
        match self.policy {
            BindPolicy::AsPtr => Variant::PtrMut(value),
            _ => Variant::RefMut(value),
        }
    }

    fn write(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
        moving: bool,
    ) -> bool {
        if self.readonly {
            return false;
        }
        let Some(obj) = Self::resolve_mut(registry, instance) else {
            return false;
        };
        let move_in = moving && !self.storage.takes_ref();
        if self.policy == BindPolicy::AsPtr {
            return self.write_pointee(registry, obj, arg, move_in);
        }

        let detect = self.policy == BindPolicy::AsRefWrapper;
        let storage = &self.storage;
        match arg {
            Variant::Ref(value) if value.is::<S::Value>() => {
                match value.downcast_ref::<S::Value>() {
                    Some(value) if detect && self.unchanged(registry, obj.as_deref(), value) => {
                        true
                    }
                    Some(value) => storage.assign(obj, Assign::Copy(value)),
                    None => false,
                }
            }
            Variant::RefMut(value) if value.is::<S::Value>() => {
                match value.downcast_mut::<S::Value>() {
                    Some(value) if detect && self.unchanged(registry, obj.as_deref(), &*value) => {
                        true
                    }
                    Some(value) if move_in => {
                        storage.assign(obj, Assign::Move(core::mem::take(value)))
                    }
                    Some(value) => storage.assign(obj, Assign::Copy(value)),
                    None => false,
                }
            }
            Variant::Value(value) if value.is::<S::Value>() => {
                if detect
                    && value
                        .downcast_ref::<S::Value>()
                        .is_some_and(|value| self.unchanged(registry, obj.as_deref(), value))
                {
                    return true;
                }
                if move_in {
                    match arg.take::<S::Value>() {
                        Some(value) => storage.assign(obj, Assign::Move(value)),
                        None => false,
                    }
                } else {
                    match value.downcast_ref::<S::Value>() {
                        Some(value) => storage.assign(obj, Assign::Copy(value)),
                        None => false,
                    }
                }
            }
            _ => false,
        }
    }

    /// Pointer arguments only. A mutable pointer is moved from when moving,
    /// a const pointer is always copied.
    fn write_pointee(
        &self,
        registry: &TypeRegistry,
        obj: Option<&mut S::Class>,
        arg: &mut Variant<'_>,
        move_in: bool,
    ) -> bool {
        match arg {
            Variant::Ptr(value) => match value.downcast_ref::<S::Value>() {
                Some(value) if self.unchanged(registry, obj.as_deref(), value) => true,
                Some(value) => self.storage.assign(obj, Assign::Copy(value)),
                None => false,
            },
            Variant::PtrMut(value) => match value.downcast_mut::<S::Value>() {
                Some(value) if self.unchanged(registry, obj.as_deref(), &*value) => true,
                Some(value) if move_in => {
                    self.storage.assign(obj, Assign::Move(core::mem::take(value)))
                }
                Some(value) => self.storage.assign(obj, Assign::Copy(value)),
                None => false,
            },
            _ => false,
        }
    }

    /// `true` when `value` equals the current value. Without an equal
    /// comparator, or a value to borrow, every write counts as a change.
    fn unchanged(
        &self,
        registry: &TypeRegistry,
        obj: Option<&S::Class>,
        value: &S::Value,
    ) -> bool {
        match (
            registry.get_equal_comparator(self.raw_value_type),
            self.storage.lend(obj),
        ) {
            (Some(comparator), Some(current)) => comparator.compare(current, value),
            _ => false,
        }
    }
}

impl<S: Storage> PropertyAccessor for PropertyWrapper<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn declaring_type(&self) -> Type {
        self.declaring_type
    }

    fn access_level(&self) -> AccessLevel {
        self.access
    }

    fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn is_static(&self) -> bool {
        S::IS_STATIC
    }

    fn value_type(&self) -> Type {
        self.value_type
    }

    fn metadata(&self, key: u64) -> &MetaValue {
        self.metadata.get(key)
    }

    fn get_value<'a>(&self, registry: &TypeRegistry, instance: Instance<'a>) -> Variant<'a> {
        let borrows = self.policy != BindPolicy::AsCopy;
        if borrows && self.is_mutable() && instance.is_mut() {
            self.read_mut(registry, instance)
        } else {
            self.read(registry, instance)
        }
    }

    fn set_value_copy(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool {
        self.write(registry, instance, arg, false)
    }

    fn set_value_move(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        arg: &mut Variant<'_>,
    ) -> bool {
        self.write(registry, instance, arg, true)
    }

    fn visit(&self, visitor: &mut dyn Any, property: &Property) {
        let info = PropertyInfo {
            property,
            storage: &self.storage,
        };
        for adapter in &self.visitors {
            adapter(&mut *visitor, &info);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use crate::property::{BindPolicy, FieldStorage, FunctionStorage, MethodStorage};
    use crate::property::{PropertyBuilder, PropertyInfo};
    use crate::registry::TypeRegistry;
    use crate::table::TypeComparator;
    use crate::ty::{TypeDraft, TypeTraits, Typed};
    use crate::value::{Instance, Variant};

    #[derive(Default)]
    struct Person {
        name: String,
        age: u32,
        writes: u32,
    }

    impl Typed for Person {
        fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
        }
    }

    fn name(p: &Person) -> &String {
        &p.name
    }

    fn set_name(p: &mut Person, name: String) {
        p.name = name;
    }

    fn set_name_ref(p: &mut Person, name: &String) {
        p.name.clone_from(name);
    }

    fn age(p: &Person) -> &u32 {
        &p.age
    }

    fn age_mut(p: &mut Person) -> &mut u32 {
        &mut p.age
    }

    fn set_age_counted(p: &mut Person, age: &u32) {
        p.writes += 1;
        p.age = *age;
    }

    #[test]
    fn move_takes_the_argument() {
        let mut registry = TypeRegistry::new();
        for policy in [BindPolicy::AsCopy, BindPolicy::AsRefWrapper] {
            let storage = MethodStorage::<Person, String>::getter_ref(name).setter(set_name);
            let property = PropertyBuilder::new("name", storage)
                .policy(policy)
                .build(&mut registry)
                .unwrap();
            let mut person = Person::default();
            let mut source = String::from("Ada");

            {
                let mut arg = Variant::from_mut(&mut source);
                let instance = Instance::from_mut(&mut person);
                assert!(property.set_value(&registry, instance, &mut arg));
            }
            assert_eq!(source, "Ada");
            assert_eq!(person.name, "Ada");

            {
                let mut arg = Variant::from_mut(&mut source);
                let instance = Instance::from_mut(&mut person);
                assert!(property.set_value_move(&registry, instance, &mut arg));
            }
            assert!(source.is_empty());
            assert_eq!(person.name, "Ada");

            let mut arg = Variant::new(String::from("Grace"));
            assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
            assert!(arg.is_valid());
            assert!(property.set_value_move(&registry, Instance::from_mut(&mut person), &mut arg));
            assert!(arg.is_empty());
            assert_eq!(person.name, "Grace");
        }
    }

    #[test]
    fn move_into_ref_setter_copies() {
        let mut registry = TypeRegistry::new();
        let storage = MethodStorage::<Person, String>::getter_ref(name).setter_ref(set_name_ref);
        let property = PropertyBuilder::new("name", storage)
            .build(&mut registry)
            .unwrap();
        let mut person = Person::default();
        let mut source = String::from("Ada");
        {
            let mut arg = Variant::from_mut(&mut source);
            let instance = Instance::from_mut(&mut person);
            assert!(property.set_value_move(&registry, instance, &mut arg));
        }
        assert_eq!(source, "Ada");
        assert_eq!(person.name, "Ada");
    }

    static GLOBAL_NAME: Mutex<String> = Mutex::new(String::new());

    #[test]
    fn global_move() {
        let mut registry = TypeRegistry::new();
        let storage = FunctionStorage::getter(|| GLOBAL_NAME.lock().unwrap().clone())
            .setter(|name: String| *GLOBAL_NAME.lock().unwrap() = name);
        let property = PropertyBuilder::new("global_name", storage)
            .build(&mut registry)
            .unwrap();
        assert!(property.is_static());
        assert!(property.declaring_type().is_sentinel());

        let mut source = String::from("Linus");
        {
            let mut arg = Variant::from_mut(&mut source);
            assert!(property.set_value(&registry, Instance::Empty, &mut arg));
        }
        assert_eq!(source, "Linus");
        {
            let mut arg = Variant::from_mut(&mut source);
            assert!(property.set_value_move(&registry, Instance::Empty, &mut arg));
        }
        assert!(source.is_empty());

        let value = property.get_value(&registry, Instance::Empty);
        assert_eq!(value.get::<String>().map(String::as_str), Some("Linus"));
    }

    #[test]
    fn pointer_bind_skips_equal_writes() {
        let mut registry = TypeRegistry::new();
        let eq = TypeComparator::equal::<u32>(&mut registry);
        assert!(registry.register_equal_comparator(eq));

        let storage = MethodStorage::<Person, u32>::getter_ref(age).setter_ref(set_age_counted);
        let property = PropertyBuilder::new("age", storage)
            .policy(BindPolicy::AsPtr)
            .build(&mut registry)
            .unwrap();
        assert_eq!(Some(property.value_type()), registry.get::<*const u32>());

        let mut person = Person {
            age: 30,
            ..Person::default()
        };
        let same = 30_u32;
        let mut arg = Variant::from_ptr(&same);
        assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert_eq!(person.writes, 0);

        let older = 31_u32;
        let mut arg = Variant::from_ptr(&older);
        assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert_eq!(person.writes, 1);
        assert_eq!(person.age, 31);

        let mut arg = Variant::new(32_u32);
        assert!(!property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert_eq!(person.age, 31);
    }

    #[test]
    fn pointer_bind_without_comparator_always_writes() {
        let mut registry = TypeRegistry::new();
        let storage = MethodStorage::<Person, u32>::getter_ref(age).setter_ref(set_age_counted);
        let property = PropertyBuilder::new("age", storage)
            .policy(BindPolicy::AsPtr)
            .build(&mut registry)
            .unwrap();

        let mut person = Person::default();
        let same = 0_u32;
        let mut arg = Variant::from_ptr(&same);
        assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert_eq!(person.writes, 1);
    }

    static EMPTY_NAME: String = String::new();
    static POINTED_NAME: Mutex<String> = Mutex::new(String::new());

    #[test]
    fn pointer_bind_moves_from_mut_pointers() {
        let mut registry = TypeRegistry::new();
        let storage = FunctionStorage::getter_ref(|| &EMPTY_NAME)
            .setter(|name: String| *POINTED_NAME.lock().unwrap() = name);
        let property = PropertyBuilder::new("pointed_name", storage)
            .policy(BindPolicy::AsPtr)
            .build(&mut registry)
            .unwrap();

        let mut source = String::from("Hi");
        {
            let mut arg = Variant::from_ptr_mut(&mut source);
            assert!(property.set_value(&registry, Instance::Empty, &mut arg));
        }
        assert_eq!(source, "Hi");
        {
            let mut arg = Variant::from_ptr(&source);
            assert!(property.set_value_move(&registry, Instance::Empty, &mut arg));
        }
        assert_eq!(source, "Hi");
        {
            let mut arg = Variant::from_ptr_mut(&mut source);
            assert!(property.set_value_move(&registry, Instance::Empty, &mut arg));
        }
        assert!(source.is_empty());
        assert_eq!(*POINTED_NAME.lock().unwrap(), "Hi");
    }

    #[test]
    fn ref_wrapper_bind_skips_equal_writes() {
        let mut registry = TypeRegistry::new();
        let eq = TypeComparator::equal::<u32>(&mut registry);
        assert!(registry.register_equal_comparator(eq));

        let storage = MethodStorage::<Person, u32>::getter_ref(age).setter_ref(set_age_counted);
        let property = PropertyBuilder::new("age", storage)
            .policy(BindPolicy::AsRefWrapper)
            .build(&mut registry)
            .unwrap();

        let mut person = Person {
            age: 30,
            ..Person::default()
        };
        let mut arg = Variant::from_ref(&30_u32);
        assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        let mut arg = Variant::new(30_u32);
        assert!(property.set_value_move(&registry, Instance::from_mut(&mut person), &mut arg));
        assert!(arg.is_valid());
        assert_eq!(person.writes, 0);

        let mut older = 31_u32;
        {
            let mut arg = Variant::from_mut(&mut older);
            assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        }
        assert_eq!(person.writes, 1);
        assert_eq!(person.age, 31);
    }

    #[test]
    fn ref_wrapper_bind_without_comparator_always_writes() {
        let mut registry = TypeRegistry::new();
        let storage = MethodStorage::<Person, u32>::getter_ref(age).setter_ref(set_age_counted);
        let property = PropertyBuilder::new("age", storage)
            .policy(BindPolicy::AsRefWrapper)
            .build(&mut registry)
            .unwrap();

        let mut person = Person::default();
        let mut arg = Variant::from_ref(&0_u32);
        assert!(property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert_eq!(person.writes, 1);
    }

    #[test]
    fn field_reads_by_policy() {
        let mut registry = TypeRegistry::new();
        let field = || FieldStorage::<Person, u32>::new(age, age_mut);

        let by_ref = PropertyBuilder::new("age", field())
            .policy(BindPolicy::AsRefWrapper)
            .build(&mut registry)
            .unwrap();
        assert_eq!(Some(by_ref.value_type()), registry.get::<&'static mut u32>());

        let mut person = Person::default();
        let mut value = by_ref.get_value(&registry, Instance::from_mut(&mut person));
        assert!(value.is_ref_wrapper());
        if let Some(age) = value.get_mut::<u32>() {
            *age = 41;
        }
        assert_eq!(person.age, 41);

        let value = by_ref.get_value(&registry, Instance::from_ref(&person));
        assert!(matches!(value, Variant::Ref(_)));

        let by_ptr = PropertyBuilder::new("age", field())
            .policy(BindPolicy::AsPtr)
            .readonly()
            .build(&mut registry)
            .unwrap();
        assert_eq!(Some(by_ptr.value_type()), registry.get::<*const u32>());
        let value = by_ptr.get_value(&registry, Instance::from_mut(&mut person));
        assert!(matches!(value, Variant::Ptr(_)));
        assert_eq!(value.get::<u32>(), Some(&41));

        let mut arg = Variant::from_ptr(&7_u32);
        assert!(!by_ptr.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
    }

    #[test]
    fn wrong_instance_is_rejected() {
        let mut registry = TypeRegistry::new();
        let property = PropertyBuilder::new("age", FieldStorage::<Person, u32>::new(age, age_mut))
            .build(&mut registry)
            .unwrap();

        let mut other = 5_u8;
        assert!(property.get_value(&registry, Instance::from_ref(&other)).is_empty());
        assert!(property.get_value(&registry, Instance::Empty).is_empty());
        let mut arg = Variant::new(3_u32);
        assert!(!property.set_value(&registry, Instance::from_mut(&mut other), &mut arg));

        let mut person = Person::default();
        let mut arg = Variant::new(3_i64);
        assert!(!property.set_value(&registry, Instance::from_mut(&mut person), &mut arg));
        assert!(!property.set_value(&registry, Instance::from_ref(&person), &mut Variant::new(3_u32)));
    }

    #[test]
    fn visitor_sees_the_storage() {
        let mut registry = TypeRegistry::new();
        let property = PropertyBuilder::new("age", FieldStorage::<Person, u32>::new(age, age_mut))
            .visitor(|visitor, info: &PropertyInfo<'_>| {
                let Some(seen) = visitor.downcast_mut::<Vec<String>>() else {
                    return;
                };
                if info.storage::<FieldStorage<Person, u32>>().is_some() {
                    seen.push(String::from(info.property.name()));
                }
            })
            .build(&mut registry)
            .unwrap();

        let mut seen: Vec<String> = Vec::new();
        property.visit(&mut seen);
        property.visit(&mut 0_u8);
        assert_eq!(seen, ["age"]);
    }
}
