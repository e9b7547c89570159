use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// Static registration

/// A registration function submitted with [`auto_register!`](crate::auto_register).
#[cfg(feature = "auto_register")]
pub struct AutoRegisterFunc(pub fn(&mut TypeRegistry));

#[cfg(feature = "auto_register")]
inventory::collect!(AutoRegisterFunc);

#[cfg(feature = "auto_register")]
pub(super) fn register_once(registry: &mut TypeRegistry) -> bool {
    if !registry.auto_registered {
        registry.auto_registered = true;
        for func in inventory::iter::<AutoRegisterFunc> {
            (func.0)(registry);
        }
        log::debug!("ran static registrations, {} types", registry.live.len());
    }
    true
}

#[cfg(not(feature = "auto_register"))]
#[inline(always)]
pub(super) fn register_once(_: &mut TypeRegistry) -> bool {
    false
}

/// Submits a registration function, run by
/// [`TypeRegistry::auto_register`](crate::registry::TypeRegistry::auto_register).
///
/// The argument is a `fn(&mut TypeRegistry)` or a non-capturing closure.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($func:expr $(,)?) => {
        const _: () = {
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::AutoRegisterFunc($func)
            }
        };
    };
}
