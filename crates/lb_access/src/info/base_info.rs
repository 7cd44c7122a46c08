use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::registry::{Described, TypeRegistry};
use crate::value::ShortName;

/// A type-erased step from a derived type to its embedded base.
pub trait RawUpcast: Send + Sync + 'static {
    /// Returns the embedded base, or `None` if `derived` has another type.
    fn upcast<'a>(&self, derived: &'a dyn Any) -> Option<&'a dyn Any>;

    fn upcast_mut<'a>(&self, derived: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Upcast<T, B> {
    get: fn(&T) -> &B,
    get_mut: fn(&mut T) -> &mut B,
}

impl<T: Any + Send + Sync, B: Any + Send + Sync> RawUpcast for Upcast<T, B> {
    fn upcast<'a>(&self, derived: &'a dyn Any) -> Option<&'a dyn Any> {
        let derived = derived.downcast_ref::<T>()?;
        Some((self.get)(derived) as &dyn Any)
    }

    fn upcast_mut<'a>(&self, derived: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let derived = derived.downcast_mut::<T>()?;
        Some((self.get_mut)(derived) as &mut dyn Any)
    }
}

/// The base type of a registered type.
///
/// Inheritance is modelled as embedding: the derived struct holds its base
/// as a field, and the upcast borrows that field.
#[derive(Clone)]
pub struct BaseInfo {
    type_id: TypeId,
    type_name: ShortName,
    upcast: Arc<dyn RawUpcast>,
    register: fn(&mut TypeRegistry),
}

impl BaseInfo {
    pub(crate) fn new<T, B>(get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> Self
    where
        T: Any + Send + Sync,
        B: Described,
    {
        Self {
            type_id: TypeId::of::<B>(),
            type_name: ShortName::of::<B>(),
            upcast: Arc::new(Upcast { get, get_mut }),
            register: TypeRegistry::register::<B>,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> ShortName {
        self.type_name
    }

    #[inline]
    pub fn upcast(&self) -> &Arc<dyn RawUpcast> {
        &self.upcast
    }

    /// Registers the base type, see [`TypeRegistry::register`].
    #[inline]
    pub(crate) fn register(&self) -> fn(&mut TypeRegistry) {
        self.register
    }
}

impl fmt::Debug for BaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BaseInfo").field(&self.type_name).finish()
    }
}
