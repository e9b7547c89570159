use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::member::{Constructor, Destructor, Enumeration, Method};
use crate::meta::{MetaValue, MetadataTable};
use crate::property::Property;
use crate::ty::{BaseClass, CreateFn, TemplateArgument, Type, TypeTraits};

// -----------------------------------------------------------------------------
// Visit

/// Which end of a type visit a [`VisitTypeFn`] is called for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeVisit {
    Begin,
    End,
}

/// Callback invoked by [`TypeRegistry::visit_type`].
///
/// [`TypeRegistry::visit_type`]: crate::registry::TypeRegistry::visit_type
pub type VisitTypeFn = Arc<dyn Fn(&mut dyn Any, Type, TypeVisit) + Send + Sync>;

// -----------------------------------------------------------------------------
// ClassData

/// Class level data of a type.
///
/// `properties` and `methods` hold the inherited items first (most-base
/// first) followed by the items declared on the type itself.
#[derive(Default)]
pub struct ClassData {
    pub(crate) base_types: Vec<BaseClass>,
    pub(crate) derived_types: Vec<Type>,
    pub(crate) properties: Vec<Property>,
    pub(crate) methods: Vec<Method>,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) destructor: Option<Destructor>,
}

impl ClassData {
    #[inline]
    pub fn base_types(&self) -> &[BaseClass] {
        &self.base_types
    }

    #[inline]
    pub fn derived_types(&self) -> &[Type] {
        &self.derived_types
    }

    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[inline]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    #[inline]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    #[inline]
    pub fn destructor(&self) -> Option<&Destructor> {
        self.destructor.as_ref()
    }
}

// -----------------------------------------------------------------------------
// TypeRecord

/// The data of one registry slot.
///
/// Obtained through [`TypeRegistry::record`]. The sentinel record and every
/// unregistered slot report `is_valid() == false`, their links point at
/// [`Type::INVALID`].
///
/// [`TypeRegistry::record`]: crate::registry::TypeRegistry::record
pub struct TypeRecord {
    pub(crate) raw_type: Type,
    pub(crate) wrapped_type: Type,
    pub(crate) array_element_type: Type,
    pub(crate) full_name: String,
    pub(crate) name: String,
    pub(crate) type_id: Option<TypeId>,
    pub(crate) size: usize,
    pub(crate) pointer_dimension: u32,
    pub(crate) traits: TypeTraits,
    pub(crate) create_variant: Option<CreateFn>,
    pub(crate) create_wrapper: Option<CreateFn>,
    pub(crate) enumeration: Option<Arc<Enumeration>>,
    pub(crate) key_type: Type,
    pub(crate) value_type: Type,
    pub(crate) template_arguments: Vec<TemplateArgument>,
    pub(crate) class: ClassData,
    pub(crate) metadata: MetadataTable,
    pub(crate) dependents: Vec<Type>,
    pub(crate) visit_type: Option<VisitTypeFn>,
    pub(crate) custom_named: bool,
    pub(crate) is_valid: bool,
}

impl TypeRecord {
    pub(crate) const INVALID_NAME: &'static str = "!invalid_type";

    /// The sentinel pattern. All links point at slot `0`.
    pub(crate) fn invalid() -> Self {
        Self {
            raw_type: Type::INVALID,
            wrapped_type: Type::INVALID,
            array_element_type: Type::INVALID,
            full_name: String::from(Self::INVALID_NAME),
            name: String::from(Self::INVALID_NAME),
            type_id: None,
            size: 0,
            pointer_dimension: 0,
            traits: TypeTraits::empty(),
            create_variant: None,
            create_wrapper: None,
            enumeration: None,
            key_type: Type::INVALID,
            value_type: Type::INVALID,
            template_arguments: Vec::new(),
            class: ClassData::default(),
            metadata: MetadataTable::empty(),
            dependents: Vec::new(),
            visit_type: None,
            custom_named: false,
            is_valid: false,
        }
    }

    /// Resets to the sentinel pattern, keeping both names and the dependents.
    pub(crate) fn invalidate(&mut self) {
        let full_name = core::mem::take(&mut self.full_name);
        let name = core::mem::take(&mut self.name);
        let dependents = core::mem::take(&mut self.dependents);
        *self = Self::invalid();
        self.full_name = full_name;
        self.name = name;
        self.dependents = dependents;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The display name, possibly customized or derived.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display name was set through
    /// [`TypeRegistry::custom_name`](crate::registry::TypeRegistry::custom_name).
    #[inline]
    pub fn has_custom_name(&self) -> bool {
        self.custom_named
    }

    /// The canonical name.
    #[inline]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn pointer_dimension(&self) -> u32 {
        self.pointer_dimension
    }

    #[inline]
    pub fn traits(&self) -> TypeTraits {
        self.traits
    }

    #[inline]
    pub fn raw_type(&self) -> Type {
        self.raw_type
    }

    #[inline]
    pub fn wrapped_type(&self) -> Type {
        self.wrapped_type
    }

    #[inline]
    pub fn array_element_type(&self) -> Type {
        self.array_element_type
    }

    #[inline]
    pub fn key_type(&self) -> Type {
        self.key_type
    }

    #[inline]
    pub fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub fn template_arguments(&self) -> &[TemplateArgument] {
        &self.template_arguments
    }

    #[inline]
    pub fn class(&self) -> &ClassData {
        &self.class
    }

    #[inline]
    pub fn enumeration(&self) -> Option<&Enumeration> {
        self.enumeration.as_deref()
    }

    #[inline]
    pub fn metadata(&self, key: u64) -> &MetaValue {
        self.metadata.get(key)
    }

    /// Types whose display name embeds this one.
    #[inline]
    pub fn dependents(&self) -> &[Type] {
        &self.dependents
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.traits.contains(TypeTraits::CLASS)
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.traits.contains(TypeTraits::ENUM)
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.traits.contains(TypeTraits::ARRAY)
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        self.traits.contains(TypeTraits::POINTER)
    }

    #[inline]
    pub fn is_arithmetic(&self) -> bool {
        self.traits.contains(TypeTraits::ARITHMETIC)
    }

    #[inline]
    pub fn is_function_pointer(&self) -> bool {
        self.traits.contains(TypeTraits::FUNCTION_POINTER)
    }

    #[inline]
    pub fn is_associative_container(&self) -> bool {
        self.traits.contains(TypeTraits::ASSOCIATIVE_CONTAINER)
    }

    #[inline]
    pub fn is_sequential_container(&self) -> bool {
        self.traits.contains(TypeTraits::SEQUENTIAL_CONTAINER)
    }

    #[inline]
    pub fn is_template_instantiation(&self) -> bool {
        self.traits.contains(TypeTraits::TEMPLATE_INSTANTIATION)
    }

    #[inline]
    pub fn is_wrapper(&self) -> bool {
        !self.wrapped_type.is_sentinel()
    }
}

impl core::fmt::Debug for TypeRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRecord")
            .field("name", &self.name)
            .field("full_name", &self.full_name)
            .field("is_valid", &self.is_valid)
            .finish_non_exhaustive()
    }
}
