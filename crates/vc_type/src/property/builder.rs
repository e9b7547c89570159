use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use crate::error::RegistrationError;
use crate::member::AccessLevel;
use crate::meta::{Metadata, MetadataTable};
use crate::property::{BindPolicy, Property, PropertyInfo, PropertyWrapper, Storage, VisitorAdapter};
use crate::registry::TypeRegistry;
use crate::ty::Type;

// -----------------------------------------------------------------------------
// PropertyBuilder

/// Declares a property over a [`Storage`].
///
/// Declarations that could never work are rejected by [`build`] instead of
/// failing later at access time.
///
/// [`build`]: PropertyBuilder::build
pub struct PropertyBuilder<S: Storage> {
    name: String,
    storage: S,
    policy: BindPolicy,
    readonly: bool,
    access: AccessLevel,
    metadata: Vec<Metadata>,
    visitors: Vec<VisitorAdapter>,
}

impl<S: Storage> PropertyBuilder<S> {
    pub fn new(name: impl Into<String>, storage: S) -> Self {
        Self {
            name: name.into(),
            storage,
            policy: BindPolicy::AsCopy,
            readonly: false,
            access: AccessLevel::Public,
            metadata: Vec::new(),
            visitors: Vec::new(),
        }
    }

    #[inline]
    pub fn policy(mut self, policy: BindPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
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

    pub fn visitor(
        mut self,
        adapter: impl Fn(&mut dyn Any, &PropertyInfo<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.visitors.push(Arc::new(adapter));
        self
    }

    /// Registers the types the property refers to and builds it.
    ///
    /// The property still has to be attached with
    /// [`TypeRegistry::register_property`] or
    /// [`TypeRegistry::register_global_property`].
    pub fn build(self, registry: &mut TypeRegistry) -> Result<Property, RegistrationError> {
        if !self.readonly && !self.storage.is_writable() {
            return Err(RegistrationError::MissingSetter(self.name));
        }
        if self.policy != BindPolicy::AsCopy && !self.storage.can_lend() {
            return Err(RegistrationError::BorrowRequired(self.name));
        }

        let raw_value_type = registry.register::<S::Value>();
        if self.policy == BindPolicy::AsPtr && registry.record(raw_value_type).is_pointer() {
            return Err(RegistrationError::PointerPolicyOnPointer(self.name));
        }

        let mutable = !self.readonly && S::LENDS_MUT;
        let value_type = match (self.policy, mutable) {
            (BindPolicy::AsCopy, _) => raw_value_type,
            (BindPolicy::AsPtr, true) => registry.register::<*mut S::Value>(),
            (BindPolicy::AsPtr, false) => registry.register::<*const S::Value>(),
            (BindPolicy::AsRefWrapper, true) => registry.register::<&'static mut S::Value>(),
            (BindPolicy::AsRefWrapper, false) => registry.register::<&'static S::Value>(),
        };
        let declaring_type = if S::IS_STATIC {
            Type::INVALID
        } else {
            registry.register::<S::Class>()
        };

        Ok(Property::new(PropertyWrapper {
            name: self.name,
            declaring_type,
            access: self.access,
            policy: self.policy,
            readonly: self.readonly,
            value_type,
            raw_value_type,
            storage: self.storage,
            metadata: MetadataTable::new(self.metadata),
            visitors: self.visitors,
        }))
    }
}
