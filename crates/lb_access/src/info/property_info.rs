use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::Visibility;
use crate::info::field_info::{StaticGet, StaticSet};
use crate::info::{RawGet, RawSet};
use crate::value::{Boxable, ConversionError, TypeRef, Value};

// -----------------------------------------------------------------------------
// Raw accessors

struct PropertyGet<T, V> {
    get: fn(&T) -> V,
}

impl<T: Any + Send + Sync, V: Boxable> RawGet for PropertyGet<T, V> {
    fn get(&self, target: Option<&dyn Any>) -> Option<Value> {
        let target = target?.downcast_ref::<T>()?;
        Some((self.get)(target).into_value())
    }
}

struct PropertySet<T, V> {
    set: fn(&mut T, V),
}

impl<T: Any + Send + Sync, V: Boxable> RawSet for PropertySet<T, V> {
    fn set(
        &self,
        target: Option<&mut dyn Any>,
        value: Value,
    ) -> Option<Result<(), ConversionError>> {
        let target = target?.downcast_mut::<T>()?;
        Some(V::from_value(value).map(|value| (self.set)(target, value)))
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// A registered property: a computed getter and an optional setter.
///
/// The getter and setter carry their own visibility, so a property with a
/// public getter and a private setter is described as such.
#[derive(Clone)]
pub struct PropertyInfo {
    name: &'static str,
    is_static: bool,
    ty: TypeRef,
    get: (Visibility, Arc<dyn RawGet>),
    set: Option<(Visibility, Arc<dyn RawSet>)>,
}

impl PropertyInfo {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The visibility of the getter.
    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.get.0
    }

    #[inline]
    pub fn setter_visibility(&self) -> Option<Visibility> {
        self.set.as_ref().map(|(visibility, _)| *visibility)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn raw_get(&self) -> &Arc<dyn RawGet> {
        &self.get.1
    }

    #[inline]
    pub fn raw_set(&self) -> Option<&Arc<dyn RawSet>> {
        self.set.as_ref().map(|(_, raw)| raw)
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("name", &self.name)
            .field("visibility", &self.get.0)
            .field("setter_visibility", &self.setter_visibility())
            .field("is_static", &self.is_static)
            .field("ty", &self.ty)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Builders

/// Builds an instance [`PropertyInfo`] of `T` with value type `V`.
pub struct Property<T, V> {
    name: &'static str,
    get: (Visibility, fn(&T) -> V),
    set: Option<(Visibility, fn(&mut T, V))>,
}

impl<T: Any + Send + Sync, V: Boxable> Property<T, V> {
    /// Starts a read-only property.
    #[inline]
    pub fn new(name: &'static str, visibility: Visibility, get: fn(&T) -> V) -> Self {
        Self {
            name,
            get: (visibility, get),
            set: None,
        }
    }

    #[inline]
    pub fn setter(mut self, visibility: Visibility, set: fn(&mut T, V)) -> Self {
        self.set = Some((visibility, set));
        self
    }

    pub(crate) fn into_info(self) -> PropertyInfo {
        let (visibility, get) = self.get;
        PropertyInfo {
            name: self.name,
            is_static: false,
            ty: V::type_ref(),
            get: (visibility, Arc::new(PropertyGet { get }) as Arc<dyn RawGet>),
            set: self.set.map(|(visibility, set)| {
                (visibility, Arc::new(PropertySet { set }) as Arc<dyn RawSet>)
            }),
        }
    }
}

/// Builds a static [`PropertyInfo`] with value type `V`.
pub struct StaticProperty<V> {
    name: &'static str,
    get: (Visibility, fn() -> V),
    set: Option<(Visibility, fn(V))>,
}

impl<V: Boxable> StaticProperty<V> {
    #[inline]
    pub fn new(name: &'static str, visibility: Visibility, get: fn() -> V) -> Self {
        Self {
            name,
            get: (visibility, get),
            set: None,
        }
    }

    #[inline]
    pub fn setter(mut self, visibility: Visibility, set: fn(V)) -> Self {
        self.set = Some((visibility, set));
        self
    }

    pub(crate) fn into_info(self) -> PropertyInfo {
        let (visibility, get) = self.get;
        PropertyInfo {
            name: self.name,
            is_static: true,
            ty: V::type_ref(),
            get: (visibility, Arc::new(StaticGet { get }) as Arc<dyn RawGet>),
            set: self.set.map(|(visibility, set)| {
                (visibility, Arc::new(StaticSet { set }) as Arc<dyn RawSet>)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Property;
    use crate::info::Visibility;
    use crate::value::Value;

    struct Account {
        owner: String,
    }

    #[test]
    fn getter_and_private_setter() {
        let info = Property::new("Owner", Visibility::Public, |a: &Account| a.owner.clone())
            .setter(Visibility::Private, |a, owner| a.owner = owner)
            .into_info();

        assert_eq!(info.visibility(), Visibility::Public);
        assert_eq!(info.setter_visibility(), Some(Visibility::Private));

        let mut account = Account { owner: String::from("ann") };
        let set = info.raw_set().unwrap();
        set.set(Some(&mut account), Value::from("bob")).unwrap().unwrap();
        assert_eq!(info.raw_get().get(Some(&account)), Some(Value::from("bob")));

        assert!(set.set(Some(&mut account), Value::I32(1)).unwrap().is_err());
        assert_eq!(info.raw_get().get(Some(&String::new())), None);
    }
}
