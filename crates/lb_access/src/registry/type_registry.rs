use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use lb_utils::TypeIdMap;

use crate::info::{RawUpcast, TypeInfo};
use crate::registry::Described;
use crate::value::ShortName;

// -----------------------------------------------------------------------------
// TypeRegistry

/// The store of every described type.
///
/// Built once at startup, then usually frozen inside an
/// [`AccessorCache`](crate::AccessorCache), which only needs `&TypeRegistry`.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use lb_access::info::{TypeInfo, Visibility};
/// use lb_access::registry::{Described, TypeRegistry};
///
/// #[derive(Default)]
/// struct Base;
/// #[derive(Default)]
/// struct Derived {
///     base: Base,
/// }
///
/// impl Described for Base {
///     fn type_info() -> TypeInfo {
///         TypeInfo::builder::<Self>().build()
///     }
/// }
///
/// impl Described for Derived {
///     fn type_info() -> TypeInfo {
///         TypeInfo::builder::<Self>()
///             .base::<Base>(|d| &d.base, |d| &mut d.base)
///             .default_constructor(Visibility::Public)
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Derived>();
///
/// // The base type is registered with it.
/// assert!(registry.contains(TypeId::of::<Base>()));
/// assert!(registry.is_assignable(TypeId::of::<Derived>(), TypeId::of::<Base>()));
/// assert!(!registry.is_assignable(TypeId::of::<Base>(), TypeId::of::<Derived>()));
/// ```
pub struct TypeRegistry {
    types: TypeIdMap<TypeInfo>,
    /// Set once `inventory` submissions were seen, see [`Self::auto_register`].
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub(crate) auto_registered: bool,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            types: TypeIdMap::new(),
            auto_registered: false,
        }
    }

    /// Creates a registry holding every type submitted with
    /// [`auto_register!`](crate::auto_register).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.auto_register();
        registry
    }

    /// Inserts `info` unless its type is already registered.
    ///
    /// Returns `true` if it was inserted. Base types are _not_ registered,
    /// use [`register`](Self::register) for that.
    #[inline]
    pub fn insert(&mut self, info: TypeInfo) -> bool {
        self.insert_with(info.id(), || info)
    }

    /// Registers `T`, its base type and its dependencies, unless `T` is already registered.
    pub fn register<T: Described>(&mut self) {
        if !self.insert_with(TypeId::of::<T>(), T::type_info) {
            return;
        }
        let register_base = self
            .get(TypeId::of::<T>())
            .and_then(TypeInfo::base)
            .map(|base| base.register());
        if let Some(register_base) = register_base {
            register_base(self);
        }
        T::register_dependencies(self);
    }

    fn insert_with(&mut self, type_id: TypeId, type_info: impl FnOnce() -> TypeInfo) -> bool {
        self.types.try_insert(type_id, type_info)
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap and never insert duplicates.
    ///
    /// Returns `true` if automatic registration works on the current platform.
    /// Without the `auto_register` feature this does nothing and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if !self.auto_registered {
                crate::__macro_exports::auto_register::register_types(self);
            }
            self.auto_registered
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.types.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeInfo> {
        self.types.get(&type_id)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeInfo> {
        self.types.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The name used in errors, also for unregistered types.
    pub(crate) fn name_of(&self, type_id: TypeId) -> ShortName {
        match self.get(type_id) {
            Some(info) => info.name(),
            None => ShortName::new("<unregistered>"),
        }
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    /// Iterates `type_id` itself, then its base types, most-derived first.
    ///
    /// Stops at the first base type that is not registered.
    pub fn ancestors(&self, type_id: TypeId) -> impl Iterator<Item = &TypeInfo> {
        core::iter::successors(self.get(type_id), |info| {
            info.base().and_then(|base| self.get(base.type_id()))
        })
    }

    /// Whether a `from` can be used where a `to` is expected.
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        from == to || self.ancestors(from).any(|info| info.id() == to)
    }

    /// The upcasts leading from `from` to its base type `to`.
    ///
    /// Returns an empty path if both are the same type, and `None`
    /// if `to` is not a registered ancestor of `from`.
    pub fn upcast_path(&self, from: TypeId, to: TypeId) -> Option<Vec<Arc<dyn RawUpcast>>> {
        let mut path = Vec::new();
        for info in self.ancestors(from) {
            if info.id() == to {
                return Some(path);
            }
            path.push(Arc::clone(info.base()?.upcast()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::info::TypeInfo;

    struct Item;

    #[test]
    fn auto_register_collects_submitted_types() {
        let mut registry = TypeRegistry::empty();
        if registry.auto_register() {
            let len = registry.len();
            assert!(registry.contains(TypeId::of::<crate::fixtures::Person>()));
            assert!(registry.auto_register());
            assert_eq!(registry.len(), len);
        }
    }

    #[test]
    fn auto_register_adds_only_submitted_types() {
        let registry = TypeRegistry::new();
        if registry.auto_registered {
            assert_eq!(registry.len(), 1);
            assert!(registry.contains(TypeId::of::<crate::fixtures::Person>()));
        }
    }

    #[test]
    fn register_pulls_in_the_base_type() {
        let registry = crate::fixtures::registry();
        let employee = TypeId::of::<crate::fixtures::Employee>();
        let person = TypeId::of::<crate::fixtures::Person>();
        assert!(registry.contains(person));
        assert!(registry.is_assignable(employee, person));
        assert_eq!(registry.upcast_path(employee, person).map(|p| p.len()), Some(1));
        assert_eq!(registry.upcast_path(person, employee).map(|p| p.len()), None);
        assert_eq!(registry.ancestors(employee).count(), 2);
    }

    #[test]
    fn insert_keeps_the_first_registration() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.insert(TypeInfo::builder::<Item>().build()));
        assert!(!registry.insert(TypeInfo::builder::<Item>().build()));
        assert_eq!(registry.len(), 1);
    }
}
