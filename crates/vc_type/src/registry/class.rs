use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use crate::member::{Constructor, Destructor, Enumeration, Method};
use crate::property::Property;
use crate::registry::TypeRegistry;
use crate::ty::{Type, TypeVisit, VisitTypeFn};

// -----------------------------------------------------------------------------
// Class members

impl TypeRegistry {
    /// Rebuilds the property and method lists of `ty` and of every type
    /// deriving from it.
    ///
    /// A list holds the lists of the direct bases, most-base first and
    /// without repeats, followed by the items `ty` declares itself.
    pub(super) fn refresh_class_items(&mut self, ty: Type) {
        if !self.is_valid(ty) {
            return;
        }
        let class = &self.record(ty).class;

        let mut properties: Vec<Property> = Vec::new();
        let mut methods: Vec<Method> = Vec::new();
        for edge in &class.base_types {
            let base = &self.record(edge.ty()).class;
            for property in &base.properties {
                if !properties.contains(property) {
                    properties.push(property.clone());
                }
            }
            for method in &base.methods {
                if !methods.contains(method) {
                    methods.push(method.clone());
                }
            }
        }
        properties.extend(
            class
                .properties
                .iter()
                .filter(|p| p.declaring_type() == ty)
                .cloned(),
        );
        methods.extend(
            class
                .methods
                .iter()
                .filter(|m| m.declaring_type() == ty)
                .cloned(),
        );
        let derived = class.derived_types.clone();

        let class = &mut self.slots[ty.index()].class;
        class.properties = properties;
        class.methods = methods;

        for child in derived {
            self.refresh_class_items(child);
        }
    }

    /// Attaches a property to the type declaring it.
    ///
    /// Fails if `ty` is not the declaring type of `property`, or if `ty`
    /// itself already declares a property of that name.
    pub fn register_property(&mut self, ty: Type, property: Property) -> bool {
        if !property.is_valid() || property.declaring_type() != ty {
            return false;
        }
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let duplicate = record
            .class
            .properties
            .iter()
            .any(|p| p.declaring_type() == ty && p.name() == property.name());
        if duplicate {
            log::warn!(
                "property `{}` is already declared on `{}`",
                property.name(),
                record.name
            );
            return false;
        }
        record.class.properties.push(property);
        self.refresh_class_items(ty);
        true
    }

    pub fn unregister_property(&mut self, ty: Type, property: &Property) -> bool {
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let Some(index) = record
            .class
            .properties
            .iter()
            .position(|p| p == property && p.declaring_type() == ty)
        else {
            return false;
        };
        record.class.properties.remove(index);
        self.refresh_class_items(ty);
        true
    }

    /// Attaches a method to the type declaring it.
    ///
    /// Fails if `ty` already declares a method with the same name and
    /// parameter types.
    pub fn register_method(&mut self, ty: Type, method: Method) -> bool {
        if method.declaring_type() != ty {
            return false;
        }
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let duplicate = record.class.methods.iter().any(|m| {
            m.declaring_type() == ty && m.matches(method.name(), method.parameter_types())
        });
        if duplicate {
            log::warn!(
                "method `{}` is already declared on `{}`",
                method.name(),
                record.name
            );
            return false;
        }
        record.class.methods.push(method);
        self.refresh_class_items(ty);
        true
    }

    pub fn unregister_method(&mut self, ty: Type, method: &Method) -> bool {
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let Some(index) = record
            .class
            .methods
            .iter()
            .position(|m| m == method && m.declaring_type() == ty)
        else {
            return false;
        };
        record.class.methods.remove(index);
        self.refresh_class_items(ty);
        true
    }

    /// Fails if a constructor with the same parameter types exists.
    pub fn register_constructor(&mut self, ty: Type, constructor: Constructor) -> bool {
        if constructor.declaring_type() != ty {
            return false;
        }
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let constructors = &mut record.class.constructors;
        if constructors
            .iter()
            .any(|c| c.parameter_types() == constructor.parameter_types())
        {
            return false;
        }
        constructors.push(constructor);
        true
    }

    pub fn unregister_constructor(&mut self, ty: Type, constructor: &Constructor) -> bool {
        let Some(record) = self.valid_slot_mut(ty) else {
            return false;
        };
        let before = record.class.constructors.len();
        record.class.constructors.retain(|c| !c.same(constructor));
        before != record.class.constructors.len()
    }

    /// A type has at most one destructor.
    pub fn register_destructor(&mut self, ty: Type, destructor: Destructor) -> bool {
        if destructor.declaring_type() != ty {
            return false;
        }
        match self.valid_slot_mut(ty) {
            Some(record) if record.class.destructor.is_none() => {
                record.class.destructor = Some(destructor);
                true
            }
            _ => false,
        }
    }

    pub fn unregister_destructor(&mut self, ty: Type) -> bool {
        self.valid_slot_mut(ty)
            .and_then(|record| record.class.destructor.take())
            .is_some()
    }

    /// A type has at most one enumeration.
    pub fn register_enumeration(&mut self, ty: Type, enumeration: Enumeration) -> bool {
        if enumeration.declaring_type() != ty {
            return false;
        }
        match self.valid_slot_mut(ty) {
            Some(record) if record.enumeration.is_none() => {
                record.enumeration = Some(Arc::new(enumeration));
                true
            }
            _ => false,
        }
    }

    pub fn unregister_enumeration(&mut self, ty: Type) -> bool {
        self.valid_slot_mut(ty)
            .and_then(|record| record.enumeration.take())
            .is_some()
    }

    // -------------------------------------------------------------------------
    // Queries

    /// The properties of `ty`, inherited ones first.
    #[inline]
    pub fn properties(&self, ty: Type) -> &[Property] {
        self.record(ty).class.properties()
    }

    /// Finds a property of `ty` or of one of its bases.
    ///
    /// A property declared closer to `ty` hides a base property of the same
    /// name. Returns [`Property::invalid`] if there is none.
    pub fn get_property(&self, ty: Type, name: &str) -> Property {
        self.properties(ty)
            .iter()
            .rev()
            .find(|p| p.name() == name)
            .cloned()
            .unwrap_or_else(Property::invalid)
    }

    /// The methods of `ty`, inherited ones first.
    #[inline]
    pub fn methods(&self, ty: Type) -> &[Method] {
        self.record(ty).class.methods()
    }

    pub fn get_method(&self, ty: Type, name: &str, parameter_types: &[Type]) -> Option<&Method> {
        self.methods(ty)
            .iter()
            .rev()
            .find(|m| m.matches(name, parameter_types))
    }

    /// Finds a method by name only, the one declared closest to `ty`.
    pub fn get_method_by_name(&self, ty: Type, name: &str) -> Option<&Method> {
        self.methods(ty).iter().rev().find(|m| m.name() == name)
    }

    #[inline]
    pub fn constructors(&self, ty: Type) -> &[Constructor] {
        self.record(ty).class.constructors()
    }

    #[inline]
    pub fn destructor(&self, ty: Type) -> Option<&Destructor> {
        self.record(ty).class.destructor()
    }

    #[inline]
    pub fn enumeration(&self, ty: Type) -> Option<&Enumeration> {
        self.record(ty).enumeration()
    }

    // -------------------------------------------------------------------------
    // Visiting

    /// Installs the begin/end callback of [`visit_type`](Self::visit_type).
    ///
    /// Replaces the previous callback.
    pub fn register_visit_type_func(
        &mut self,
        ty: Type,
        func: impl Fn(&mut dyn Any, Type, TypeVisit) + Send + Sync + 'static,
    ) -> bool {
        let func: VisitTypeFn = Arc::new(func);
        match self.valid_slot_mut(ty) {
            Some(record) => {
                record.visit_type = Some(func);
                true
            }
            None => false,
        }
    }

    /// Walks `ty` with `visitor`.
    ///
    /// The type callback, if any, is called with [`TypeVisit::Begin`], then
    /// every property runs its visitor adapters, then the callback is called
    /// with [`TypeVisit::End`].
    pub fn visit_type(&self, ty: Type, visitor: &mut dyn Any) -> bool {
        let record = self.record(ty);
        if !record.is_valid {
            return false;
        }
        if let Some(func) = &record.visit_type {
            func(&mut *visitor, ty, TypeVisit::Begin);
        }
        for property in record.class.properties() {
            property.visit(&mut *visitor);
        }
        if let Some(func) = &record.visit_type {
            func(visitor, ty, TypeVisit::End);
        }
        true
    }
}
