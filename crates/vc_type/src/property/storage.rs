use alloc::sync::Arc;

use crate::ty::Typed;

// -----------------------------------------------------------------------------
// Storage

/// A value handed to [`Storage::assign`].
pub enum Assign<'v, A> {
    /// Clone from a borrow.
    Copy(&'v A),
    /// Take ownership.
    Move(A),
}

impl<A: Clone> Assign<'_, A> {
    #[inline]
    fn into_owned(self) -> A {
        match self {
            Self::Copy(value) => value.clone(),
            Self::Move(value) => value,
        }
    }
}

/// Where a property value physically lives.
///
/// The object is `None` for static storage and for an instance storage
/// called without an object.
pub trait Storage: Send + Sync + 'static {
    /// The declaring class, `()` for static storage.
    type Class: Typed;

    type Value: Typed + Clone + Default;

    const IS_STATIC: bool;

    /// Borrows can be lent mutably.
    const LENDS_MUT: bool;

    /// Borrows can be lent at all, required by the pointer and
    /// reference-wrapper policies.
    fn can_lend(&self) -> bool;

    fn is_writable(&self) -> bool;

    /// The setter takes its argument by reference and is never moved into.
    fn takes_ref(&self) -> bool;

    fn fetch(&self, obj: Option<&Self::Class>) -> Option<Self::Value>;

    fn lend<'a>(&self, obj: Option<&'a Self::Class>) -> Option<&'a Self::Value>;

    fn lend_mut<'a>(&self, obj: Option<&'a mut Self::Class>) -> Option<&'a mut Self::Value>;

    fn assign(&self, obj: Option<&mut Self::Class>, value: Assign<'_, Self::Value>) -> bool;
}

// -----------------------------------------------------------------------------
// FieldStorage

/// A field of `C`, reached through a pair of projections.
pub struct FieldStorage<C, A> {
    get: fn(&C) -> &A,
    get_mut: fn(&mut C) -> &mut A,
}

impl<C, A> FieldStorage<C, A> {
    #[inline]
    pub const fn new(get: fn(&C) -> &A, get_mut: fn(&mut C) -> &mut A) -> Self {
        Self { get, get_mut }
    }

    #[inline]
    pub fn projections(&self) -> (fn(&C) -> &A, fn(&mut C) -> &mut A) {
        (self.get, self.get_mut)
    }
}

impl<C: Typed, A: Typed + Clone + Default> Storage for FieldStorage<C, A> {
    type Class = C;
    type Value = A;

    const IS_STATIC: bool = false;
    const LENDS_MUT: bool = true;

    fn can_lend(&self) -> bool {
        true
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn takes_ref(&self) -> bool {
        false
    }

    fn fetch(&self, obj: Option<&C>) -> Option<A> {
        self.lend(obj).cloned()
    }

    fn lend<'a>(&self, obj: Option<&'a C>) -> Option<&'a A> {
        obj.map(self.get)
    }

    fn lend_mut<'a>(&self, obj: Option<&'a mut C>) -> Option<&'a mut A> {
        obj.map(self.get_mut)
    }

    fn assign(&self, obj: Option<&mut C>, value: Assign<'_, A>) -> bool {
        match obj {
            Some(obj) => {
                *(self.get_mut)(obj) = value.into_owned();
                true
            }
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// MethodStorage

enum MethodGetter<C, A> {
    ByValue(fn(&C) -> A),
    ByRef(fn(&C) -> &A),
}

enum MethodSetter<C, A> {
    ByValue(fn(&mut C, A)),
    ByRef(fn(&mut C, &A)),
}

/// A getter/setter method pair of `C`.
pub struct MethodStorage<C, A> {
    getter: MethodGetter<C, A>,
    setter: Option<MethodSetter<C, A>>,
}

impl<C, A> MethodStorage<C, A> {
    /// A getter returning by value. Cannot be bound by pointer or reference.
    #[inline]
    pub const fn getter(get: fn(&C) -> A) -> Self {
        Self {
            getter: MethodGetter::ByValue(get),
            setter: None,
        }
    }

    #[inline]
    pub const fn getter_ref(get: fn(&C) -> &A) -> Self {
        Self {
            getter: MethodGetter::ByRef(get),
            setter: None,
        }
    }

    /// A setter taking its argument by value.
    #[inline]
    pub fn setter(mut self, set: fn(&mut C, A)) -> Self {
        self.setter = Some(MethodSetter::ByValue(set));
        self
    }

    /// A setter taking its argument by reference.
    #[inline]
    pub fn setter_ref(mut self, set: fn(&mut C, &A)) -> Self {
        self.setter = Some(MethodSetter::ByRef(set));
        self
    }
}

impl<C: Typed, A: Typed + Clone + Default> Storage for MethodStorage<C, A> {
    type Class = C;
    type Value = A;

    const IS_STATIC: bool = false;
    const LENDS_MUT: bool = false;

    fn can_lend(&self) -> bool {
        matches!(self.getter, MethodGetter::ByRef(_))
    }

    fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    fn takes_ref(&self) -> bool {
        matches!(self.setter, Some(MethodSetter::ByRef(_)))
    }

    fn fetch(&self, obj: Option<&C>) -> Option<A> {
        let obj = obj?;
        Some(match self.getter {
            MethodGetter::ByValue(get) => get(obj),
            MethodGetter::ByRef(get) => get(obj).clone(),
        })
    }

    fn lend<'a>(&self, obj: Option<&'a C>) -> Option<&'a A> {
        match self.getter {
            MethodGetter::ByRef(get) => obj.map(get),
            MethodGetter::ByValue(_) => None,
        }
    }

    fn lend_mut<'a>(&self, _: Option<&'a mut C>) -> Option<&'a mut A> {
        None
    }

    fn assign(&self, obj: Option<&mut C>, value: Assign<'_, A>) -> bool {
        let (Some(obj), Some(setter)) = (obj, &self.setter) else {
            return false;
        };
        match (setter, value) {
            (MethodSetter::ByRef(set), Assign::Copy(value)) => set(obj, value),
            (MethodSetter::ByRef(set), Assign::Move(value)) => set(obj, &value),
            (MethodSetter::ByValue(set), value) => set(obj, value.into_owned()),
        }
        true
    }
}

// -----------------------------------------------------------------------------
// FunctionStorage

enum FunctionGetter<A: 'static> {
    ByValue(Arc<dyn Fn() -> A + Send + Sync>),
    ByRef(Arc<dyn Fn() -> &'static A + Send + Sync>),
}

enum FunctionSetter<A> {
    ByValue(Arc<dyn Fn(A) + Send + Sync>),
    ByRef(Arc<dyn Fn(&A) + Send + Sync>),
}

/// A free getter/setter pair. Always static.
pub struct FunctionStorage<A: 'static> {
    getter: FunctionGetter<A>,
    setter: Option<FunctionSetter<A>>,
}

impl<A: 'static> FunctionStorage<A> {
    pub fn getter(get: impl Fn() -> A + Send + Sync + 'static) -> Self {
        Self {
            getter: FunctionGetter::ByValue(Arc::new(get)),
            setter: None,
        }
    }

    pub fn getter_ref(get: impl Fn() -> &'static A + Send + Sync + 'static) -> Self {
        Self {
            getter: FunctionGetter::ByRef(Arc::new(get)),
            setter: None,
        }
    }

    pub fn setter(mut self, set: impl Fn(A) + Send + Sync + 'static) -> Self {
        self.setter = Some(FunctionSetter::ByValue(Arc::new(set)));
        self
    }

    pub fn setter_ref(mut self, set: impl Fn(&A) + Send + Sync + 'static) -> Self {
        self.setter = Some(FunctionSetter::ByRef(Arc::new(set)));
        self
    }
}

impl<A: Typed + Clone + Default> Storage for FunctionStorage<A> {
    type Class = ();
    type Value = A;

    const IS_STATIC: bool = true;
    const LENDS_MUT: bool = false;

    fn can_lend(&self) -> bool {
        matches!(self.getter, FunctionGetter::ByRef(_))
    }

    fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    fn takes_ref(&self) -> bool {
        matches!(self.setter, Some(FunctionSetter::ByRef(_)))
    }

    fn fetch(&self, _: Option<&()>) -> Option<A> {
        Some(match &self.getter {
            FunctionGetter::ByValue(get) => get(),
            FunctionGetter::ByRef(get) => get().clone(),
        })
    }

    fn lend<'a>(&self, _: Option<&'a ()>) -> Option<&'a A> {
        match &self.getter {
            FunctionGetter::ByRef(get) => Some(get()),
            FunctionGetter::ByValue(_) => None,
        }
    }

    fn lend_mut<'a>(&self, _: Option<&'a mut ()>) -> Option<&'a mut A> {
        None
    }

    fn assign(&self, _: Option<&mut ()>, value: Assign<'_, A>) -> bool {
        match (&self.setter, value) {
            (Some(FunctionSetter::ByRef(set)), Assign::Copy(value)) => set(value),
            (Some(FunctionSetter::ByRef(set)), Assign::Move(value)) => set(&value),
            (Some(FunctionSetter::ByValue(set)), value) => set(value.into_owned()),
            (None, _) => return false,
        }
        true
    }
}
