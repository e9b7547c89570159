use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::sync::atomic::{AtomicBool, Ordering};

use vc_utils::TypeIdMap;
use vc_utils::hash::{FixedHashState, HashMap};

use crate::member::Method;
use crate::meta::{MetaValue, Metadata};
use crate::property::Property;
use crate::table::{DataTable, TypeComparator, TypeConverter};
use crate::ty::{BaseClass, Type, TypeDraft, TypeRecord, Typed, name};
use crate::value::Variant;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The owning context of every registered type.
///
/// Records live in a growth-only slot vector, a [`Type`] is an index into
/// it. Slot `0` is the invalid sentinel, its links all point back at
/// itself so walks over raw, wrapped or element types terminate there.
///
/// Mutation takes `&mut self`, share the registry through
/// [`TypeRegistryArc`](crate::registry::TypeRegistryArc) to get the one
/// writer lock around each whole operation.
///
/// Duplicates are never errors: registrations return `false` and leave the
/// registry untouched.
///
/// # Examples
///
/// ```
/// use vc_type::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// let ptr = registry.register::<*const String>();
///
/// assert_eq!(registry.record(ptr).name(), "*const String");
/// assert_eq!(registry.get_by_name("*const String"), Some(ptr));
/// ```
pub struct TypeRegistry {
    pub(super) slots: Vec<TypeRecord>,
    pub(super) live: Vec<Type>,
    pub(super) type_ids: TypeIdMap<Type>,
    pub(super) by_original_name: HashMap<String, Type>,
    pub(super) by_name: HashMap<String, Type>,
    pub(super) global_properties: Vec<Property>,
    pub(super) global_property_index: HashMap<String, Vec<Property>>,
    pub(super) global_methods: Vec<Method>,
    pub(super) global_method_index: HashMap<String, Vec<Method>>,
    pub(super) converters: DataTable<TypeConverter>,
    pub(super) equal_comparators: DataTable<TypeComparator>,
    pub(super) less_than_comparators: DataTable<TypeComparator>,
    pub(super) shutdown_hooks: Vec<Arc<AtomicBool>>,
    #[cfg_attr(not(feature = "auto_register"), expect(dead_code))]
    pub(super) auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the invalid sentinel.
    pub fn empty() -> Self {
        Self {
            slots: vec![TypeRecord::invalid()],
            live: Vec::new(),
            type_ids: TypeIdMap::new(),
            by_original_name: HashMap::with_hasher(FixedHashState),
            by_name: HashMap::with_hasher(FixedHashState),
            global_properties: Vec::new(),
            global_property_index: HashMap::with_hasher(FixedHashState),
            global_methods: Vec::new(),
            global_method_index: HashMap::with_hasher(FixedHashState),
            converters: DataTable::new(),
            equal_comparators: DataTable::new(),
            less_than_comparators: DataTable::new(),
            shutdown_hooks: Vec::new(),
            auto_registered: false,
        }
    }

    /// Creates a registry with the standard types registered.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String` (displayed as `String`) and `&'static str`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<&'static str>();
        let string = registry.register::<String>();
        registry.custom_name(string, "String");
        registry
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// The invalid sentinel, also returned for any out of range handle.
    #[inline]
    pub fn invalid_type(&self) -> Type {
        Type::INVALID
    }

    /// The record of `ty`.
    ///
    /// Handles of another registry or past the end read the sentinel.
    #[inline]
    pub fn record(&self, ty: Type) -> &TypeRecord {
        match self.slots.get(ty.index()) {
            Some(record) => record,
            None => &self.slots[0],
        }
    }

    #[inline]
    pub(super) fn valid_slot_mut(&mut self, ty: Type) -> Option<&mut TypeRecord> {
        self.slots.get_mut(ty.index()).filter(|r| r.is_valid)
    }

    /// Whether `ty` names a registered, not unregistered, slot.
    #[inline]
    pub fn is_valid(&self, ty: Type) -> bool {
        self.record(ty).is_valid
    }

    /// The handle of `T`, if it has been registered.
    #[inline]
    pub fn get<T: Any>(&self) -> Option<Type> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<Type> {
        self.type_ids
            .get(&type_id)
            .copied()
            .filter(|ty| self.is_valid(*ty))
    }

    /// Looks a type up by its display name.
    pub fn get_by_name(&self, name: &str) -> Option<Type> {
        self.by_name
            .get(name)
            .copied()
            .filter(|ty| self.is_valid(*ty))
    }

    /// Looks a type up by its canonical name.
    pub fn get_by_original_name(&self, name: &str) -> Option<Type> {
        self.by_original_name
            .get(name)
            .copied()
            .filter(|ty| self.is_valid(*ty))
    }

    /// The registered types, in registration order.
    #[inline]
    pub fn types(&self) -> impl ExactSizeIterator<Item = Type> + '_ {
        self.live.iter().copied()
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Registers `T` and everything its draft refers to.
    ///
    /// Cheap after the first call.
    pub fn register<T: Typed>(&mut self) -> Type {
        if let Some(ty) = self.get::<T>() {
            return ty;
        }
        let draft = T::type_draft(self);
        self.register_type(draft).0
    }

    /// Stores a drafted type.
    ///
    /// Returns the existing handle and `false` when a valid type with the
    /// same canonical name (or [`TypeId`]) is registered. An unregistered
    /// slot of the same canonical name is reused in place.
    pub fn register_type(&mut self, draft: TypeDraft) -> (Type, bool) {
        if let Some(ty) = draft.type_id.and_then(|id| self.get_by_type_id(id)) {
            return (ty, false);
        }

        let (ty, reused) = match self.by_original_name.get(draft.name.as_str()).copied() {
            Some(ty) if self.is_valid(ty) => return (ty, false),
            Some(ty) => {
                log::debug!("reusing slot {} for type `{}`", ty.index(), draft.name);
                (ty, true)
            }
            None => {
                let ty = Type::from_index(self.slots.len());
                self.slots.push(TypeRecord::invalid());
                (ty, false)
            }
        };

        let TypeDraft {
            name,
            type_id,
            size,
            pointer_dimension,
            traits,
            raw_type,
            wrapped_type,
            array_element_type,
            key_type,
            value_type,
            template_arguments,
            base_classes,
            create_variant,
            create_wrapper,
        } = draft;

        let record = &mut self.slots[ty.index()];
        // Types embedding a reused slot keep pointing at it.
        let dependents = core::mem::take(&mut record.dependents);
        *record = TypeRecord::invalid();
        record.dependents = dependents;
        record.full_name = name.clone();
        record.name = name.clone();
        record.type_id = type_id;
        record.size = size;
        record.pointer_dimension = pointer_dimension;
        record.traits = traits;
        record.raw_type = raw_type.filter(|raw| !raw.is_sentinel()).unwrap_or(ty);
        record.wrapped_type = wrapped_type;
        record.array_element_type = array_element_type;
        record.key_type = key_type;
        record.value_type = value_type;
        record.template_arguments = template_arguments;
        record.create_variant = create_variant;
        record.create_wrapper = create_wrapper;
        record.is_valid = true;

        self.live.push(ty);
        if let Some(type_id) = type_id {
            self.type_ids.insert(type_id, ty);
        }
        self.by_original_name.insert(name, ty);

        let display = self.derive_name(ty);
        self.slots[ty.index()].name = display.clone();
        self.by_name.insert(display, ty);

        for base in base_classes {
            self.link_base(ty, base);
        }
        for dependency in self.dependencies(ty) {
            let dependents = &mut self.slots[dependency.index()].dependents;
            if !dependents.contains(&ty) {
                dependents.push(ty);
            }
        }
        self.refresh_class_items(ty);
        if reused {
            self.rename_dependents(ty);
        }

        log::debug!("registered type `{}` as {ty:?}", self.record(ty).name);
        (ty, true)
    }

    /// Removes `ty` from every graph and index, leaving a reusable slot.
    ///
    /// The canonical name stays indexed so that registering the same type
    /// again lands in the same slot. Converters from `ty` and comparators of
    /// `ty` are dropped with it.
    pub fn unregister_type(&mut self, ty: Type) -> bool {
        if ty.is_sentinel() || !self.is_valid(ty) {
            return false;
        }

        self.live.retain(|t| *t != ty);

        let bases: Vec<Type> = self.record(ty).class.base_types.iter().map(BaseClass::ty).collect();
        for base in bases {
            self.slots[base.index()].class.derived_types.retain(|t| *t != ty);
        }

        let derived = self.record(ty).class.derived_types.clone();
        for child in derived {
            self.slots[child.index()]
                .class
                .base_types
                .retain(|edge| edge.ty() != ty);
            self.refresh_class_items(child);
        }

        for dependency in self.dependencies(ty) {
            self.slots[dependency.index()].dependents.retain(|t| *t != ty);
        }

        let record = &self.slots[ty.index()];
        if let Some(type_id) = record.type_id {
            self.type_ids.remove(&type_id);
        }
        if self.by_name.get(record.name.as_str()) == Some(&ty) {
            self.by_name.remove(record.name.as_str());
        }

        self.converters.remove_all(ty);
        self.equal_comparators.remove_all(ty);
        self.less_than_comparators.remove_all(ty);

        self.slots[ty.index()].invalidate();
        log::debug!("unregistered type `{}`", self.record(ty).name);
        true
    }

    /// Adds metadata to a type. Keys it already has are skipped.
    ///
    /// Returns the number of entries added.
    pub fn metadata(&mut self, ty: Type, metadata: Vec<Metadata>) -> usize {
        match self.valid_slot_mut(ty) {
            Some(record) => record.metadata.amend(metadata),
            None => 0,
        }
    }

    #[inline]
    pub fn get_metadata(&self, ty: Type, key: u64) -> &MetaValue {
        self.record(ty).metadata(key)
    }

    // -------------------------------------------------------------------------
    // Names

    /// The display name `ty` would get from its canonical name and the
    /// current display names of the types it embeds.
    pub fn derive_name(&self, ty: Type) -> String {
        let record = self.record(ty);
        let element = self.record(record.array_element_type);
        let raw = self.record(record.raw_type);

        let mut derived = if record.is_array() && element.is_valid {
            name::substitute(&record.full_name, &element.full_name, &element.name)
        } else if record.raw_type != ty && raw.is_valid {
            name::substitute(&record.full_name, &raw.full_name, &raw.name)
        } else {
            name::normalize(&record.full_name)
        };

        if record.is_template_instantiation() && !record.custom_named {
            let arguments: Vec<Option<&str>> = record
                .template_arguments
                .iter()
                .map(|argument| {
                    let arg = self.record(argument.ty);
                    (argument.is_type_param && arg.is_valid).then_some(arg.name.as_str())
                })
                .collect();
            derived = name::substitute_template_arguments(&derived, &arguments);
        }
        derived
    }

    /// Renames the display name of `ty` and re-derives the display names
    /// of every type embedding it.
    ///
    /// Returns `false` if `ty` is invalid or already has that name.
    pub fn custom_name(&mut self, ty: Type, name: impl Into<String>) -> bool {
        let name = name.into();
        match self.valid_slot_mut(ty) {
            Some(record) if record.name != name => record.custom_named = true,
            _ => return false,
        }
        log::debug!("renaming `{}` to `{name}`", self.record(ty).name);
        self.set_display_name(ty, name);
        self.rename_dependents(ty);
        true
    }

    fn set_display_name(&mut self, ty: Type, name: String) {
        let record = &mut self.slots[ty.index()];
        if record.name == name {
            return;
        }
        let old = core::mem::replace(&mut record.name, name.clone());
        if self.by_name.get(old.as_str()) == Some(&ty) {
            self.by_name.remove(old.as_str());
        }
        self.by_name.insert(name, ty);
    }

    fn rename_dependents(&mut self, ty: Type) {
        let dependents = self.record(ty).dependents.clone();
        for dependent in dependents {
            let record = self.record(dependent);
            if dependent == ty || !record.is_valid || record.custom_named {
                continue;
            }
            let name = self.derive_name(dependent);
            self.set_display_name(dependent, name);
            self.rename_dependents(dependent);
        }
    }

    /// The types whose display name `ty` embeds.
    fn dependencies(&self, ty: Type) -> Vec<Type> {
        let record = self.record(ty);
        let mut dependencies = Vec::new();
        if record.is_array() {
            dependencies.push(record.array_element_type);
        }
        dependencies.push(record.raw_type);
        dependencies.extend(record.template_arguments.iter().map(|arg| arg.ty));

        let mut unique = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if dependency != ty && self.is_valid(dependency) && !unique.contains(&dependency) {
                unique.push(dependency);
            }
        }
        unique
    }

    // -------------------------------------------------------------------------
    // Base classes

    /// Declares `base` as a base class of `derived`.
    ///
    /// Returns `false` if the edge exists, either type is invalid or the
    /// edge would close a cycle.
    pub fn register_base_class(&mut self, derived: Type, base: BaseClass) -> bool {
        if !self.link_base(derived, base) {
            return false;
        }
        self.refresh_class_items(derived);
        true
    }

    /// Removes the edge `derived -> base` from both sides.
    pub fn unregister_base_class(&mut self, derived: Type, base: Type) -> bool {
        let Some(record) = self.valid_slot_mut(derived) else {
            return false;
        };
        let before = record.class.base_types.len();
        record.class.base_types.retain(|edge| edge.ty() != base);
        if before == record.class.base_types.len() {
            return false;
        }
        if let Some(record) = self.slots.get_mut(base.index()) {
            record.class.derived_types.retain(|t| *t != derived);
        }
        self.refresh_class_items(derived);
        true
    }

    fn link_base(&mut self, derived: Type, base: BaseClass) -> bool {
        let base_ty = base.ty();
        if !self.is_valid(derived) || !self.is_valid(base_ty) {
            log::warn!("base class edge {derived:?} -> {base_ty:?} names an unregistered type");
            return false;
        }
        if self.is_base_of(derived, base_ty) {
            log::warn!(
                "`{}` cannot derive from `{}`",
                self.record(derived).name,
                self.record(base_ty).name
            );
            return false;
        }
        if self.record(derived).class.base_types.iter().any(|edge| edge.ty() == base_ty) {
            return false;
        }

        let mut edges = core::mem::take(&mut self.slots[derived.index()].class.base_types);
        edges.push(base);
        // Stable, and an ancestor always has fewer ancestors than its heirs.
        edges.sort_by_key(|edge| self.ancestors(edge.ty()).len());
        self.slots[derived.index()].class.base_types = edges;

        let heirs = &mut self.slots[base_ty.index()].class.derived_types;
        if !heirs.contains(&derived) {
            heirs.push(derived);
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        self.assert_base_symmetry(derived, base_ty);
        true
    }

    #[cfg(all(debug_assertions, feature = "debug"))]
    fn assert_base_symmetry(&self, derived: Type, base: Type) {
        let edges = self
            .record(derived)
            .class
            .base_types
            .iter()
            .filter(|edge| edge.ty() == base)
            .count();
        let heirs = self
            .record(base)
            .class
            .derived_types
            .iter()
            .filter(|t| **t == derived)
            .count();
        debug_assert!(
            edges == 1 && heirs == 1,
            "base class lists out of sync: {derived:?} -> {base:?}"
        );
    }

    /// Every direct and indirect base of `ty`.
    fn ancestors(&self, ty: Type) -> Vec<Type> {
        let mut found = Vec::new();
        let mut stack = vec![ty];
        while let Some(current) = stack.pop() {
            for edge in &self.record(current).class.base_types {
                if !found.contains(&edge.ty()) {
                    found.push(edge.ty());
                    stack.push(edge.ty());
                }
            }
        }
        found
    }

    /// Whether `base` is `derived` or one of its direct or indirect bases.
    pub fn is_base_of(&self, base: Type, derived: Type) -> bool {
        if !self.is_valid(base) || !self.is_valid(derived) {
            return false;
        }
        base == derived || self.ancestors(derived).contains(&base)
    }

    #[inline]
    pub fn is_derived_from(&self, derived: Type, base: Type) -> bool {
        self.is_base_of(base, derived)
    }

    /// The direct base classes of `ty`, most-base first.
    #[inline]
    pub fn base_classes(&self, ty: Type) -> &[BaseClass] {
        &self.record(ty).class.base_types
    }

    /// The types declaring `ty` as a direct base.
    #[inline]
    pub fn derived_classes(&self, ty: Type) -> &[Type] {
        &self.record(ty).class.derived_types
    }

    /// Adjusts `obj`, an object of type `source`, to its `target` part.
    ///
    /// Walks the base class graph through the upcast function of each edge.
    /// Returns `None` if `target` is not a base of `source`.
    pub fn apply_offset<'a>(
        &self,
        obj: &'a dyn Any,
        source: Type,
        target: Type,
    ) -> Option<&'a dyn Any> {
        if source == target {
            return Some(obj);
        }
        let edge = self
            .base_classes(source)
            .iter()
            .find(|edge| self.is_base_of(target, edge.ty()))?;
        let part = edge.upcast(obj)?;
        self.apply_offset(part, edge.ty(), target)
    }

    pub fn apply_offset_mut<'a>(
        &self,
        obj: &'a mut dyn Any,
        source: Type,
        target: Type,
    ) -> Option<&'a mut dyn Any> {
        if source == target {
            return Some(obj);
        }
        let edge = self
            .base_classes(source)
            .iter()
            .find(|edge| self.is_base_of(target, edge.ty()))?;
        let part = edge.upcast_mut(obj)?;
        self.apply_offset_mut(part, edge.ty(), target)
    }

    // -------------------------------------------------------------------------
    // Values

    /// Boxes a copy of `value`, a value of type `ty`.
    pub fn create_variant(&self, ty: Type, value: &dyn Any) -> Variant<'static> {
        match self.record(ty).create_variant {
            Some(create) => create(value),
            None => Variant::Empty,
        }
    }

    /// Wraps `value` into the wrapper type `ty`, e.g. `Box<T>`.
    pub fn create_wrapper(&self, ty: Type, value: &dyn Any) -> Variant<'static> {
        match self.record(ty).create_wrapper {
            Some(create) => create(value),
            None => Variant::Empty,
        }
    }

    // -------------------------------------------------------------------------
    // Teardown

    /// Disables the unregistration of every live
    /// [`RegistrationManager`](crate::registry::RegistrationManager).
    ///
    /// Called on drop.
    pub fn shutdown(&mut self) {
        for hook in self.shutdown_hooks.drain(..) {
            hook.store(true, Ordering::Release);
        }
    }

    pub(super) fn add_shutdown_hook(&mut self, hook: Arc<AtomicBool>) {
        self.shutdown_hooks.push(hook);
    }

    pub(super) fn remove_shutdown_hook(&mut self, hook: &Arc<AtomicBool>) {
        self.shutdown_hooks.retain(|h| !Arc::ptr_eq(h, hook));
    }

    /// Runs every function submitted with
    /// [`auto_register!`](crate::auto_register), once per registry.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available. Without the
    /// `auto_register` feature it does nothing and returns `false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vc_type::registry::TypeRegistry;
    ///
    /// #[derive(Clone)]
    /// struct Meter(f64);
    ///
    /// impl vc_type::ty::Typed for Meter {
    ///     fn type_draft(_: &mut TypeRegistry) -> vc_type::ty::TypeDraft {
    ///         vc_type::ty::TypeDraft::of_clone::<Self>()
    ///     }
    /// }
    ///
    /// vc_type::auto_register!(|registry| {
    ///     registry.register::<Meter>();
    /// });
    ///
    /// let mut registry = TypeRegistry::empty();
    /// assert!(registry.auto_register());
    /// assert!(registry.get::<Meter>().is_some());
    /// ```
    #[inline]
    pub fn auto_register(&mut self) -> bool {
        crate::registry::auto::register_once(self)
    }
}

impl Drop for TypeRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.live.iter().map(|ty| self.record(*ty).name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::type_name;

    use super::TypeRegistry;
    use crate::meta::{Metadata, metadata_key};
    use crate::ty::{BaseClass, TypeDraft, TypeTraits, Typed};
    use crate::value::Instance;

    struct Bar;

    impl Typed for Bar {
        fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
        }
    }

    struct Shape {
        id: u32,
    }

    struct Circle {
        shape: Shape,
    }

    struct Ring {
        circle: Circle,
    }

    struct Badge {
        circle: Circle,
        shape: Shape,
    }

    impl Typed for Shape {
        fn type_draft(_: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>().traits(TypeTraits::CLASS)
        }
    }

    fn shape_of(c: &Circle) -> &Shape {
        &c.shape
    }

    fn shape_of_mut(c: &mut Circle) -> &mut Shape {
        &mut c.shape
    }

    impl Typed for Circle {
        fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>()
                .traits(TypeTraits::CLASS)
                .base(BaseClass::new::<Circle, Shape>(registry, shape_of, shape_of_mut))
        }
    }

    fn circle_of(r: &Ring) -> &Circle {
        &r.circle
    }

    fn circle_of_mut(r: &mut Ring) -> &mut Circle {
        &mut r.circle
    }

    impl Typed for Ring {
        fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>()
                .traits(TypeTraits::CLASS)
                .base(BaseClass::new::<Ring, Circle>(registry, circle_of, circle_of_mut))
        }
    }

    fn badge_circle(b: &Badge) -> &Circle {
        &b.circle
    }

    fn badge_circle_mut(b: &mut Badge) -> &mut Circle {
        &mut b.circle
    }

    fn badge_shape(b: &Badge) -> &Shape {
        &b.shape
    }

    fn badge_shape_mut(b: &mut Badge) -> &mut Shape {
        &mut b.shape
    }

    impl Typed for Badge {
        fn type_draft(registry: &mut TypeRegistry) -> TypeDraft {
            TypeDraft::of::<Self>()
                .traits(TypeTraits::CLASS)
                .base(BaseClass::new::<Badge, Circle>(registry, badge_circle, badge_circle_mut))
                .base(BaseClass::new::<Badge, Shape>(registry, badge_shape, badge_shape_mut))
        }
    }

    fn same_shape(s: &Shape) -> &Shape {
        s
    }

    fn same_shape_mut(s: &mut Shape) -> &mut Shape {
        s
    }

    #[test]
    fn sentinel_slot() {
        let registry = TypeRegistry::empty();
        let invalid = registry.invalid_type();
        assert!(invalid.is_sentinel());
        assert!(!registry.is_valid(invalid));
        assert_eq!(registry.types().len(), 0);
        assert!(!registry.record(invalid).is_valid());
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = TypeRegistry::new();
        let count = registry.types().len();

        let bar = registry.register::<Bar>();
        assert_eq!(registry.register::<Bar>(), bar);
        assert_eq!(registry.register_type(TypeDraft::of::<Bar>()), (bar, false));
        assert_eq!(registry.types().len(), count + 1);

        assert_eq!(registry.get::<Bar>(), Some(bar));
        assert_eq!(registry.get_by_original_name(type_name::<Bar>()), Some(bar));
        assert_eq!(registry.get_by_name(type_name::<Bar>()), Some(bar));
        assert!(registry.record(bar).is_class());
    }

    #[test]
    fn rename_reaches_dependents() {
        let mut registry = TypeRegistry::new();
        let bar = registry.register::<Bar>();
        let ptr = registry.register::<*const Bar>();
        let ptr_ptr = registry.register::<*const *const Bar>();
        let list = registry.register::<Vec<Bar>>();
        let array = registry.register::<[Bar; 3]>();

        assert!(registry.custom_name(bar, "Baz"));
        assert!(!registry.custom_name(bar, "Baz"));

        assert_eq!(registry.record(bar).name(), "Baz");
        assert_eq!(registry.record(ptr).name(), "*const Baz");
        assert_eq!(registry.record(ptr_ptr).name(), "*const *const Baz");
        assert_eq!(registry.record(list).name(), "alloc::vec::Vec<Baz>");
        assert_eq!(registry.record(array).name(), "[Baz; 3]");

        assert_eq!(registry.get_by_name("Baz"), Some(bar));
        assert_eq!(registry.get_by_name("*const Baz"), Some(ptr));
        assert_eq!(registry.get_by_name(type_name::<Bar>()), None);
        assert_eq!(registry.get_by_original_name(type_name::<Bar>()), Some(bar));
    }

    #[test]
    fn custom_names_survive_the_cascade() {
        let mut registry = TypeRegistry::new();
        let bar = registry.register::<Bar>();
        let ptr = registry.register::<*const Bar>();

        assert!(registry.custom_name(ptr, "BarPtr"));
        assert!(registry.custom_name(bar, "Baz"));
        assert_eq!(registry.record(ptr).name(), "BarPtr");
        assert!(registry.record(ptr).has_custom_name());
        assert_eq!(registry.derive_name(ptr), "*const Baz");
    }

    #[test]
    fn unregister_leaves_a_reusable_slot() {
        let mut registry = TypeRegistry::new();
        let bar = registry.register::<Bar>();
        let ptr = registry.register::<*const Bar>();
        let count = registry.types().len();

        assert!(registry.unregister_type(bar));
        assert!(!registry.unregister_type(bar));
        assert!(!registry.is_valid(bar));
        assert_eq!(registry.get::<Bar>(), None);
        assert_eq!(registry.types().len(), count - 1);
        assert_eq!(registry.record(bar).full_name(), type_name::<Bar>());
        assert!(registry.is_valid(ptr));

        let again = registry.register::<Bar>();
        assert_eq!(again, bar);
        assert!(registry.is_valid(bar));
        assert_eq!(registry.get::<Bar>(), Some(bar));
        assert!(registry.record(bar).dependents().contains(&ptr));
        assert!(!registry.unregister_type(registry.invalid_type()));
    }

    #[test]
    fn base_edges_stay_symmetric() {
        let mut registry = TypeRegistry::new();
        let circle = registry.register::<Circle>();
        let shape = registry.register::<Shape>();
        assert_eq!(registry.base_classes(circle).len(), 1);
        assert_eq!(registry.derived_classes(shape), [circle]);

        let edge = BaseClass::new::<Circle, Shape>(&mut registry, shape_of, shape_of_mut);
        assert!(!registry.register_base_class(circle, edge));
        assert_eq!(registry.base_classes(circle).len(), 1);
        assert_eq!(registry.derived_classes(shape).len(), 1);

        let edge = BaseClass::new::<Shape, Shape>(&mut registry, same_shape, same_shape_mut);
        assert!(!registry.register_base_class(shape, edge));

        let ring = registry.register::<Ring>();
        assert!(registry.is_base_of(shape, ring));
        assert!(registry.is_derived_from(ring, circle));
        assert!(!registry.is_base_of(ring, shape));
        assert!(registry.is_base_of(ring, ring));

        assert!(registry.unregister_base_class(circle, shape));
        assert!(!registry.unregister_base_class(circle, shape));
        assert!(registry.derived_classes(shape).is_empty());
        assert!(!registry.is_base_of(shape, ring));
    }

    #[test]
    fn bases_are_sorted_most_base_first() {
        let mut registry = TypeRegistry::new();
        let badge = registry.register::<Badge>();
        let shape = registry.register::<Shape>();
        let circle = registry.register::<Circle>();

        let bases: Vec<_> = registry.base_classes(badge).iter().map(BaseClass::ty).collect();
        assert_eq!(bases, vec![shape, circle]);
        assert_eq!(registry.derived_classes(shape).len(), 2);
    }

    #[test]
    fn offsets_follow_the_graph() {
        let mut registry = TypeRegistry::new();
        let ring = registry.register::<Ring>();
        let shape = registry.register::<Shape>();

        let mut value = Ring {
            circle: Circle {
                shape: Shape { id: 7 },
            },
        };
        let part = registry
            .apply_offset(&value, ring, shape)
            .and_then(|part| part.downcast_ref::<Shape>());
        assert_eq!(part.map(|s| s.id), Some(7));
        assert!(registry.apply_offset(&value, shape, ring).is_none());

        if let Some(shape) = Instance::from_mut(&mut value).try_convert_mut::<Shape>(&registry) {
            shape.id = 9;
        }
        assert_eq!(value.circle.shape.id, 9);
    }

    #[test]
    fn metadata_keeps_first_value() {
        let mut registry = TypeRegistry::new();
        let bar = registry.register::<Bar>();

        let added = registry.metadata(
            bar,
            vec![Metadata::named("a", 1_u32), Metadata::named("b", 2_u32)],
        );
        assert_eq!(added, 2);
        assert_eq!(registry.metadata(bar, vec![Metadata::named("a", 9_u32)]), 0);
        assert_eq!(registry.get_metadata(bar, metadata_key("a")).get::<u32>(), Some(&1));
        assert!(registry.get_metadata(bar, metadata_key("c")).is_empty());
    }
}
