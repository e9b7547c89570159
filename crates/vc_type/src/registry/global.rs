use alloc::string::String;
use alloc::vec;

use crate::member::Method;
use crate::property::Property;
use crate::registry::TypeRegistry;
use crate::ty::Type;

// -----------------------------------------------------------------------------
// Global members
//
// Every global member is stored twice: in registration order, and in a
// bucket of its name. Buckets are dropped once empty.

impl TypeRegistry {
    /// Registers a property outside of any type.
    ///
    /// Fails for a property declared on a type or if a global property of
    /// the same name exists.
    pub fn register_global_property(&mut self, property: Property) -> bool {
        if !property.is_valid() || !property.declaring_type().is_sentinel() {
            return false;
        }
        let name = property.name();
        if self.global_property_index.contains_key(name) {
            log::warn!("global property `{name}` is already registered");
            return false;
        }
        self.global_property_index
            .insert(String::from(name), vec![property.clone()]);
        self.global_properties.push(property);
        true
    }

    pub fn unregister_global_property(&mut self, property: &Property) -> bool {
        let Some(index) = self.global_properties.iter().position(|p| p == property) else {
            return false;
        };
        self.global_properties.remove(index);

        let name = property.name();
        if let Some(bucket) = self.global_property_index.get_mut(name) {
            bucket.retain(|p| p != property);
            if bucket.is_empty() {
                self.global_property_index.remove(name);
            }
        }
        true
    }

    /// The global property called `name`, or [`Property::invalid`].
    pub fn get_global_property(&self, name: &str) -> Property {
        self.global_property_index
            .get(name)
            .and_then(|bucket| bucket.first())
            .cloned()
            .unwrap_or_else(Property::invalid)
    }

    #[inline]
    pub fn global_properties(&self) -> &[Property] {
        &self.global_properties
    }

    /// Registers a free function.
    ///
    /// Overloads share a name bucket, a second function with the same name
    /// and parameter types is rejected.
    pub fn register_global_method(&mut self, method: Method) -> bool {
        if !method.declaring_type().is_sentinel() {
            return false;
        }
        let name = method.name();
        let bucket = self
            .global_method_index
            .entry(String::from(name))
            .or_default();
        if bucket
            .iter()
            .any(|m| m.matches(name, method.parameter_types()))
        {
            log::warn!("global method `{name}` is already registered");
            return false;
        }
        bucket.push(method.clone());
        self.global_methods.push(method);
        true
    }

    pub fn unregister_global_method(&mut self, method: &Method) -> bool {
        let Some(index) = self.global_methods.iter().position(|m| m == method) else {
            return false;
        };
        self.global_methods.remove(index);

        let name = method.name();
        if let Some(bucket) = self.global_method_index.get_mut(name) {
            bucket.retain(|m| m != method);
            if bucket.is_empty() {
                self.global_method_index.remove(name);
            }
        }
        true
    }

    pub fn get_global_method(&self, name: &str, parameter_types: &[Type]) -> Option<&Method> {
        self.global_method_index
            .get(name)?
            .iter()
            .find(|m| m.matches(name, parameter_types))
    }

    #[inline]
    pub fn global_methods(&self) -> &[Method] {
        &self.global_methods
    }
}
