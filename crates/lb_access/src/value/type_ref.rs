use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use thiserror::Error;

use crate::value::{Boxable, NumKind, ShortName, Value};

// -----------------------------------------------------------------------------
// ConversionError

/// A [`Value`] could not be converted to a declared type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot convert `{from}` to `{to}`")]
pub struct ConversionError {
    pub from: ShortName,
    pub to: ShortName,
}

impl ConversionError {
    #[inline]
    pub const fn new(from: ShortName, to: ShortName) -> Self {
        Self { from, to }
    }

    /// The error for `value` not converting to `T`.
    #[inline]
    pub fn of<T: Boxable>(value: &Value) -> Self {
        Self::new(value.type_name(), T::type_ref().name())
    }
}

// -----------------------------------------------------------------------------
// TypeClass

/// How a declared type accepts values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Bool,
    Char,
    Number(NumKind),
    String,
    /// A specific reference type, declared as `Arc<T>`.
    Object,
    /// Any reference type, declared as [`Object`](crate::Object).
    AnyObject,
    /// Anything at all, declared as [`Value`].
    Any,
    /// `Option<T>`, see [`TypeRef::underlying`].
    Nullable,
}

// -----------------------------------------------------------------------------
// TypeKey

/// The identity of a type as members and arguments see it.
///
/// `u64` and `Arc<u64>` share a [`TypeId`] but not a class, so they are
/// different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    pub id: TypeId,
    pub class: TypeClass,
}

impl TypeKey {
    #[inline]
    pub const fn new(id: TypeId, class: TypeClass) -> Self {
        Self { id, class }
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// The declared type of a field, property, parameter or return value.
///
/// Two `TypeRef`s are equal when they refer to the same type.
///
/// For `Arc<T>` the identity is the one of `T`, so it matches the
/// [`runtime_type`](Value::runtime_type) of an object holding a `T`.
///
/// # Examples
///
/// ```
/// use lb_access::value::{TypeClass, NumKind};
/// use lb_access::{TypeRef, Value};
///
/// let ty = TypeRef::of::<i64>();
/// assert_eq!(ty.class(), TypeClass::Number(NumKind::I64));
/// assert_eq!(ty.coerce(Value::I32(7)), Ok(Value::I64(7)));
///
/// let nullable = TypeRef::of::<Option<String>>();
/// assert!(nullable.is_nullable());
/// assert_eq!(nullable.underlying(), Some(TypeRef::of::<String>()));
/// assert_eq!(nullable.coerce(Value::Null), Ok(Value::Null));
/// ```
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: ShortName,
    class: TypeClass,
    coerce: fn(Value) -> Result<Value, ConversionError>,
    underlying: Option<fn() -> TypeRef>,
}

fn coerce_via<T: Boxable>(value: Value) -> Result<Value, ConversionError> {
    T::from_value(value).map(Boxable::into_value)
}

impl TypeRef {
    /// Creates the descriptor of `T`, coercing values through [`Boxable`].
    #[inline]
    pub fn new<T: Boxable>(id: TypeId, name: ShortName, class: TypeClass) -> Self {
        Self {
            id,
            name,
            class,
            coerce: coerce_via::<T>,
            underlying: None,
        }
    }

    /// Sets the wrapped type of a nullable type.
    #[inline]
    pub fn with_underlying(mut self, underlying: fn() -> TypeRef) -> Self {
        self.underlying = Some(underlying);
        self
    }

    #[inline]
    pub fn of<T: Boxable>() -> Self {
        T::type_ref()
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> ShortName {
        self.name
    }

    #[inline]
    pub fn class(&self) -> TypeClass {
        self.class
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.id, self.class)
    }

    /// Whether `Null` is a valid value of this type.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self.class, TypeClass::Nullable | TypeClass::Any)
    }

    /// The `T` of a nullable `Option<T>`.
    #[inline]
    pub fn underlying(&self) -> Option<TypeRef> {
        self.underlying.map(|f| f())
    }

    /// Converts `value` to the canonical representation of this type.
    ///
    /// Numbers are widened or narrowed with a range check, objects must
    /// hold exactly the declared type.
    #[inline]
    pub fn coerce(&self, value: Value) -> Result<Value, ConversionError> {
        (self.coerce)(value)
    }

    #[inline]
    pub fn is<T: Boxable>(&self) -> bool {
        self.id == T::type_ref().id
    }
}

impl PartialEq for TypeRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.class == other.class
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name, f)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;

    use super::TypeRef;
    use crate::value::{ConversionError, ShortName, TypeClass, Value};

    struct Shape;

    #[test]
    fn arc_identity_is_the_pointee() {
        let ty = TypeRef::of::<Arc<Shape>>();
        assert_eq!(ty.id(), core::any::TypeId::of::<Shape>());
        assert_eq!(ty.class(), TypeClass::Object);
        assert_eq!(ty.to_string(), "Shape");

        let value = Value::from(Arc::new(Shape));
        assert_eq!(value.runtime_type(), Some(ty.id()));
    }

    #[test]
    fn coerce_rejects_out_of_range_and_null() {
        let ty = TypeRef::of::<u8>();
        assert_eq!(ty.coerce(Value::I32(255)), Ok(Value::U8(255)));
        assert_eq!(
            ty.coerce(Value::I32(256)),
            Err(ConversionError::new(
                ShortName::of::<i32>(),
                ShortName::of::<u8>()
            ))
        );
        assert!(ty.coerce(Value::Null).is_err());
        assert!(TypeRef::of::<String>().coerce(Value::I32(1)).is_err());
    }

    #[test]
    fn value_accepts_anything() {
        let ty = TypeRef::of::<Value>();
        assert!(ty.is_nullable());
        assert_eq!(ty.coerce(Value::Null), Ok(Value::Null));
        assert_eq!(ty.coerce(Value::from("x")), Ok(Value::from("x")));
    }
}
