use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::member::AccessLevel;
use crate::meta::{MetaValue, Metadata, MetadataTable};
use crate::registry::TypeRegistry;
use crate::ty::Type;
use crate::value::{Instance, Variant};

type InvokeFn =
    Arc<dyn Fn(&TypeRegistry, Instance<'_>, &mut [Variant<'_>]) -> Variant<'static> + Send + Sync>;

struct MethodData {
    name: String,
    declaring_type: Type,
    parameter_types: Vec<Type>,
    return_type: Type,
    access: AccessLevel,
    metadata: MetadataTable,
    invoker: InvokeFn,
}

// -----------------------------------------------------------------------------
// Method

/// A callable member, or a global function when its declaring type is
/// [`Type::INVALID`].
///
/// Cloning shares the method, equality is identity.
#[derive(Clone)]
pub struct Method(Arc<MethodData>);

impl Method {
    /// Starts a method whose body is `invoker`.
    pub fn builder<F>(name: impl Into<String>, invoker: F) -> MethodBuilder
    where
        F: Fn(&TypeRegistry, Instance<'_>, &mut [Variant<'_>]) -> Variant<'static>
            + Send
            + Sync
            + 'static,
    {
        MethodBuilder {
            name: name.into(),
            declaring_type: Type::INVALID,
            parameter_types: Vec::new(),
            return_type: Type::INVALID,
            access: AccessLevel::Public,
            metadata: Vec::new(),
            invoker: Arc::new(invoker),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.0.declaring_type
    }

    #[inline]
    pub fn parameter_types(&self) -> &[Type] {
        &self.0.parameter_types
    }

    #[inline]
    pub fn return_type(&self) -> Type {
        self.0.return_type
    }

    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.0.access
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.0.declaring_type.is_sentinel()
    }

    #[inline]
    pub fn metadata(&self, key: u64) -> &MetaValue {
        self.0.metadata.get(key)
    }

    /// Same name and same parameter list.
    #[inline]
    pub fn matches(&self, name: &str, parameter_types: &[Type]) -> bool {
        self.0.name == name && self.0.parameter_types == parameter_types
    }

    #[inline]
    pub fn invoke(
        &self,
        registry: &TypeRegistry,
        instance: Instance<'_>,
        args: &mut [Variant<'_>],
    ) -> Variant<'static> {
        (self.0.invoker)(registry, instance, args)
    }
}

impl PartialEq for Method {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Method {}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.0.name)
            .field("declaring_type", &self.0.declaring_type)
            .field("parameter_types", &self.0.parameter_types)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// MethodBuilder

/// Builder returned by [`Method::builder`].
pub struct MethodBuilder {
    name: String,
    declaring_type: Type,
    parameter_types: Vec<Type>,
    return_type: Type,
    access: AccessLevel,
    metadata: Vec<Metadata>,
    invoker: InvokeFn,
}

impl MethodBuilder {
    #[inline]
    pub fn declaring_type(mut self, ty: Type) -> Self {
        self.declaring_type = ty;
        self
    }

    #[inline]
    pub fn parameter(mut self, ty: Type) -> Self {
        self.parameter_types.push(ty);
        self
    }

    #[inline]
    pub fn return_type(mut self, ty: Type) -> Self {
        self.return_type = ty;
        self
    }

    #[inline]
    pub fn access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    #[inline]
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    pub fn build(self) -> Method {
        Method(Arc::new(MethodData {
            name: self.name,
            declaring_type: self.declaring_type,
            parameter_types: self.parameter_types,
            return_type: self.return_type,
            access: self.access,
            metadata: MetadataTable::new(self.metadata),
            invoker: self.invoker,
        }))
    }
}
