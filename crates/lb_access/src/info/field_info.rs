use alloc::sync::Arc;
use core::any::Any;

use crate::info::Visibility;
use crate::value::{Boxable, ConversionError, TypeRef, Value};

// -----------------------------------------------------------------------------
// Raw accessors

/// A type-erased read of a field or property.
pub trait RawGet: Send + Sync + 'static {
    /// Reads the member of `target`, already upcast to the declaring type.
    ///
    /// Static members ignore `target`. Returns `None` if `target` is required
    /// but missing or of another type.
    fn get(&self, target: Option<&dyn Any>) -> Option<Value>;
}

/// A type-erased write of a field or property.
pub trait RawSet: Send + Sync + 'static {
    /// Writes `value` into the member of `target`, already upcast to the declaring type.
    ///
    /// The outer `None` has the same meaning as in [`RawGet::get`].
    fn set(
        &self,
        target: Option<&mut dyn Any>,
        value: Value,
    ) -> Option<Result<(), ConversionError>>;
}

pub(crate) struct InstanceField<T, V> {
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
}

impl<T: Any + Send + Sync, V: Boxable> RawGet for InstanceField<T, V> {
    fn get(&self, target: Option<&dyn Any>) -> Option<Value> {
        let target = target?.downcast_ref::<T>()?;
        Some((self.get)(target).to_value())
    }
}

impl<T: Any + Send + Sync, V: Boxable> RawSet for InstanceField<T, V> {
    fn set(
        &self,
        target: Option<&mut dyn Any>,
        value: Value,
    ) -> Option<Result<(), ConversionError>> {
        let target = target?.downcast_mut::<T>()?;
        Some(V::from_value(value).map(|value| *(self.get_mut)(target) = value))
    }
}

pub(crate) struct StaticGet<V> {
    pub(crate) get: fn() -> V,
}

impl<V: Boxable> RawGet for StaticGet<V> {
    #[inline]
    fn get(&self, _: Option<&dyn Any>) -> Option<Value> {
        Some((self.get)().into_value())
    }
}

pub(crate) struct StaticSet<V> {
    pub(crate) set: fn(V),
}

impl<V: Boxable> RawSet for StaticSet<V> {
    #[inline]
    fn set(&self, _: Option<&mut dyn Any>, value: Value) -> Option<Result<(), ConversionError>> {
        Some(V::from_value(value).map(self.set))
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// A registered field, always readable and writable.
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    visibility: Visibility,
    is_static: bool,
    ty: TypeRef,
    get: Arc<dyn RawGet>,
    set: Arc<dyn RawSet>,
}

impl FieldInfo {
    pub(crate) fn instance<T: Any + Send + Sync, V: Boxable>(
        name: &'static str,
        visibility: Visibility,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        let raw = Arc::new(InstanceField { get, get_mut });
        Self {
            name,
            visibility,
            is_static: false,
            ty: V::type_ref(),
            get: raw.clone(),
            set: raw,
        }
    }

    /// A static field, stored wherever `get` and `set` keep it.
    pub(crate) fn new_static<V: Boxable>(
        name: &'static str,
        visibility: Visibility,
        get: fn() -> V,
        set: fn(V),
    ) -> Self {
        Self {
            name,
            visibility,
            is_static: true,
            ty: V::type_ref(),
            get: Arc::new(StaticGet { get }),
            set: Arc::new(StaticSet { set }),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn raw_get(&self) -> &Arc<dyn RawGet> {
        &self.get
    }

    #[inline]
    pub fn raw_set(&self) -> &Arc<dyn RawSet> {
        &self.set
    }
}

impl core::fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("ty", &self.ty)
            .finish_non_exhaustive()
    }
}

