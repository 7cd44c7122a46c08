use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::value::ShortName;

// -----------------------------------------------------------------------------
// Object

/// A shared handle to a type-erased, reference-typed instance.
///
/// Cloning an `Object` clones the handle, not the instance,
/// and two objects are equal only when they are the same instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use lb_access::Object;
///
/// let object = Object::new(Arc::new(String::from("shared")));
/// let again = object.clone();
///
/// assert_eq!(object, again);
/// assert_eq!(object.downcast_ref::<String>().unwrap(), "shared");
/// assert_eq!(object.type_name().to_string(), "String");
/// ```
#[derive(Clone)]
pub struct Object {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: ShortName,
}

impl Object {
    /// Wraps a shared instance.
    #[inline]
    pub fn new<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: ShortName::of::<T>(),
        }
    }

    /// Wraps an owned, already type-erased instance.
    ///
    /// `type_name` should be the full path of the boxed type.
    #[inline]
    pub fn from_boxed(value: Box<dyn Any + Send + Sync>, type_name: ShortName) -> Self {
        Self {
            inner: Arc::from(value),
            type_name,
        }
    }

    /// Returns the [`TypeId`] of the wrapped instance.
    #[inline]
    pub fn instance_type_id(&self) -> TypeId {
        Any::type_id(&*self.inner)
    }

    #[inline]
    pub fn type_name(&self) -> ShortName {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recovers the typed handle, or gives the object back on a type mismatch.
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self> {
        let type_name = self.type_name;
        self.inner
            .downcast::<T>()
            .map_err(|inner| Self { inner, type_name })
    }

    /// Whether both handles point at the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Object {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.type_name)
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for Object {
    #[inline]
    fn from(value: Arc<T>) -> Self {
        Self::new(value)
    }
}
