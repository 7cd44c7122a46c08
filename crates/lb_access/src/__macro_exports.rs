//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::registry::{Described, TypeRegistry};

    /// One submission of [`auto_register!`](crate::auto_register).
    pub struct AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(AutoRegisterFunc);

    #[inline]
    pub fn register_type<T: Described>(registry: &mut TypeRegistry) {
        registry.register::<T>();
    }

    /// Submitted once, so a registry can tell whether `inventory` works on this platform.
    fn mark_available(registry: &mut TypeRegistry) {
        registry.auto_registered = true;
    }

    inventory::submit! {
        AutoRegisterFunc(mark_available)
    }

    pub(crate) fn register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
