use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::compile::{Constructor, Getter, Invoker, Setter};
use crate::compile::{compile_constructor, compile_getter, compile_method, compile_setter};
use crate::dynamic::call_shape::{CallShape, ShapeRef};
use crate::dynamic::{DynamicHandle, MemberTable, overload};
use crate::info::MemberKind;
use crate::registry::{MemberDescriptor, MemberKey, TypeRegistry};
use crate::value::TypeKey;
use crate::{AccessError, Value};

use super::memo::Memo;

// -----------------------------------------------------------------------------
// AccessKind

/// The operation a cached accessor performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    Get,
    Set,
    Invoke,
    Construct,
}

/// A compiled accessor of any [`AccessKind`].
#[derive(Debug, Clone)]
pub enum CacheEntry {
    Getter(Getter),
    Setter(Setter),
    Invoker(Invoker),
    Constructor(Constructor),
}

impl CacheEntry {
    #[inline]
    pub fn kind(&self) -> AccessKind {
        match self {
            Self::Getter(_) => AccessKind::Get,
            Self::Setter(_) => AccessKind::Set,
            Self::Invoker(_) => AccessKind::Invoke,
            Self::Constructor(_) => AccessKind::Construct,
        }
    }
}

// -----------------------------------------------------------------------------
// AccessorCache

/// Compiles accessors on first use and hands out the same accessor afterwards.
///
/// The cache is `Send + Sync` and meant to be shared, typically behind an
/// `Arc` or in a `static`. Lookups only take a read lock. Compilation runs
/// outside any lock, so two threads may compile the same member at once; the
/// first stored accessor is kept and returned to both.
///
/// Failed compilations are never cached.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use lb_access::info::{TypeInfo, Visibility};
/// use lb_access::registry::TypeRegistry;
/// use lb_access::{AccessorCache, Value};
///
/// #[derive(Default)]
/// struct Counter {
///     hits: u64,
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.insert(
///     TypeInfo::builder::<Counter>()
///         .field("hits", Visibility::Private, |c| &c.hits, |c| &mut c.hits)
///         .build(),
/// );
/// let cache = AccessorCache::new(registry);
///
/// let hits = cache.registry().field(TypeId::of::<Counter>(), "hits").unwrap();
/// let mut counter = Counter::default();
///
/// cache.setter(&hits).unwrap().set(Some(&mut counter), Value::U64(3)).unwrap();
/// assert_eq!(cache.getter(&hits).unwrap().get(Some(&counter)), Ok(Value::U64(3)));
/// assert_eq!(cache.len(), 2);
/// ```
pub struct AccessorCache {
    registry: Arc<TypeRegistry>,
    getters: Memo<MemberKey, Getter>,
    setters: Memo<MemberKey, Setter>,
    invokers: Memo<MemberKey, Invoker>,
    constructors: Memo<TypeId, Constructor>,
    tables: Memo<TypeId, Arc<MemberTable>>,
    dispatch: Memo<CallShape, MemberDescriptor>,
}

impl AccessorCache {
    /// Creates an empty cache over `registry`.
    ///
    /// The registry is frozen from now on.
    pub fn new(registry: TypeRegistry) -> Self {
        Self::from_arc(Arc::new(registry))
    }

    /// Creates an empty cache over a shared registry.
    pub fn from_arc(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            getters: Memo::new(),
            setters: Memo::new(),
            invokers: Memo::new(),
            constructors: Memo::new(),
            tables: Memo::new(),
            dispatch: Memo::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the accessor performing `kind` on `descriptor`, compiling it if needed.
    ///
    /// [`AccessKind::Construct`] needs a constructor descriptor, as returned
    /// by [`TypeRegistry::constructor`].
    pub fn get_or_compile(
        &self,
        kind: AccessKind,
        descriptor: &MemberDescriptor,
    ) -> Result<CacheEntry, AccessError> {
        Ok(match kind {
            AccessKind::Get => CacheEntry::Getter(self.getter(descriptor)?),
            AccessKind::Set => CacheEntry::Setter(self.setter(descriptor)?),
            AccessKind::Invoke => CacheEntry::Invoker(self.invoker(descriptor)?),
            AccessKind::Construct => {
                if descriptor.kind() != MemberKind::Constructor {
                    return Err(descriptor.not_found());
                }
                CacheEntry::Constructor(self.constructor(descriptor.declaring())?)
            }
        })
    }

    pub fn getter(&self, descriptor: &MemberDescriptor) -> Result<Getter, AccessError> {
        self.getters.get_or_try_insert(descriptor.key(), || {
            compile_getter(&self.registry, descriptor)
        })
    }

    pub fn setter(&self, descriptor: &MemberDescriptor) -> Result<Setter, AccessError> {
        self.setters.get_or_try_insert(descriptor.key(), || {
            compile_setter(&self.registry, descriptor)
        })
    }

    pub fn invoker(&self, descriptor: &MemberDescriptor) -> Result<Invoker, AccessError> {
        self.invokers.get_or_try_insert(descriptor.key(), || {
            compile_method(&self.registry, descriptor)
        })
    }

    pub fn constructor(&self, type_id: TypeId) -> Result<Constructor, AccessError> {
        self.constructors.get_or_try_insert(&type_id, || {
            compile_constructor(&self.registry, type_id)
        })
    }

    /// Number of compiled accessors held.
    pub fn len(&self) -> usize {
        self.getters.len() + self.setters.len() + self.invokers.len() + self.constructors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wraps `target` for by-name member access.
    #[inline]
    pub fn wrap<'a>(&'a self, target: &'a mut dyn Any) -> DynamicHandle<'a> {
        DynamicHandle::new(self, target)
    }

    /// Returns the members reachable by name on `type_id`, inherited ones included.
    ///
    /// An unregistered type gets an empty table.
    pub fn member_table(&self, type_id: TypeId) -> Arc<MemberTable> {
        if let Some(table) = self.tables.get(&type_id) {
            return table;
        }
        let table = Arc::new(MemberTable::build(&self.registry, type_id));
        self.tables.insert(type_id, table)
    }

    /// Picks the overload of `name` in `table` that best fits the runtime types of `args`.
    ///
    /// The choice only depends on the argument types, so it is remembered
    /// per `(type, name, argument types)`.
    pub fn resolve_call(
        &self,
        table: &MemberTable,
        name: &str,
        args: &[Value],
    ) -> Result<MemberDescriptor, AccessError> {
        let arg_types: Vec<Option<TypeKey>> = args.iter().map(Value::type_key).collect();
        let shape = ShapeRef {
            type_id: table.type_id(),
            name,
            args: &arg_types,
        };
        if let Some(found) = self.dispatch.get(&shape) {
            log::trace!("reusing `{found}` for `{name}`");
            return Ok(found);
        }

        let resolved = overload::resolve_overload(table, name, args)
            .inspect_err(|err| log::debug!("dynamic call failed: {err}"))?
            .clone();
        log::debug!("resolved `{name}` on `{}` to `{resolved}`", table.type_name());
        Ok(self.dispatch.insert(shape.to_shape(), resolved))
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("types", &self.registry.len())
            .field("accessors", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::{AccessKind, CacheEntry};
    use crate::fixtures::{Echo, Person, cache};
    use crate::{AccessError, AccessorCache, TypeRef, Value};

    #[test]
    fn accessors_are_compiled_once() {
        let cache = cache();
        let name = cache.registry().field(TypeId::of::<Echo>(), "Name").unwrap();

        let first = cache.getter(&name).unwrap();
        let second = cache.getter(&name).unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(cache.len(), 1);

        cache.setter(&name).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = cache();
        let length = cache.registry().property(TypeId::of::<Echo>(), "Length").unwrap();

        assert!(matches!(cache.setter(&length), Err(AccessError::NoSetter { .. })));
        assert!(matches!(cache.setter(&length), Err(AccessError::NoSetter { .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_compiles_converge() {
        let cache = cache();
        let echo = TypeId::of::<Echo>();
        let name = cache.registry().field(echo, "Name").unwrap();
        let echo2 = cache
            .registry()
            .method(echo, "EchoInternal2", &[TypeRef::of::<i32>()])
            .unwrap();

        let (getters, invokers): (Vec<_>, Vec<_>) = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| (cache.getter(&name).unwrap(), cache.invoker(&echo2).unwrap())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).unzip()
        });

        assert!(getters.iter().all(|g| g.ptr_eq(&getters[0])));
        assert!(invokers.iter().all(|i| i.ptr_eq(&invokers[0])));
        assert_eq!(cache.len(), 2);

        let mut args = [Value::I32(5)];
        let reply = invokers[3].invoke(Some(&mut Echo::default()), &mut args);
        assert_eq!(reply, Ok(Some(Value::from("Int: 5"))));
    }

    #[test]
    fn entries_of_every_kind() {
        let cache = cache();
        let person = TypeId::of::<Person>();
        let age = cache.registry().field(person, "Age").unwrap();
        let ctor = cache.registry().constructor(person).unwrap();

        for kind in [AccessKind::Get, AccessKind::Set] {
            assert_eq!(cache.get_or_compile(kind, &age).unwrap().kind(), kind);
        }
        assert!(matches!(
            cache.get_or_compile(AccessKind::Construct, &age),
            Err(AccessError::MemberNotFound { .. })
        ));

        let CacheEntry::Constructor(constructor) =
            cache.get_or_compile(AccessKind::Construct, &ctor).unwrap()
        else {
            panic!("expected a constructor");
        };
        assert!(constructor.create().downcast_ref::<Person>().is_some());
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn caches_share_a_registry() {
        let shared = Arc::new(crate::fixtures::registry());
        let a = AccessorCache::from_arc(Arc::clone(&shared));
        let b = AccessorCache::from_arc(shared);

        a.constructor(TypeId::of::<Echo>()).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
