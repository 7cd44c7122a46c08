use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};

use crate::value::numeric::cast;
use crate::value::{ConversionError, NumKind, Object, ShortName, TypeClass, TypeRef, Value};

// -----------------------------------------------------------------------------
// Boxable

/// A type that can be stored in a [`Value`].
///
/// Every field, property, parameter and return type of a registered member
/// must implement it. Reference types are declared as `Arc<T>`, nullable
/// types as `Option<T>`.
///
/// # Examples
///
/// ```
/// use lb_access::{Boxable, Value};
///
/// assert_eq!(7_i32.to_value(), Value::I32(7));
/// assert_eq!(i64::from_value(Value::U8(7)), Ok(7));
/// assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
/// assert!(u8::from_value(Value::I32(-1)).is_err());
/// ```
pub trait Boxable: Sized + Send + Sync + 'static {
    /// The declared type descriptor.
    fn type_ref() -> TypeRef;

    fn to_value(&self) -> Value;

    #[inline]
    fn into_value(self) -> Value {
        self.to_value()
    }

    /// Converts a value back, with the same rules as [`TypeRef::coerce`].
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

#[inline]
fn type_ref_of<T: Boxable>(class: TypeClass) -> TypeRef {
    TypeRef::new::<T>(TypeId::of::<T>(), ShortName::of::<T>(), class)
}

impl Boxable for bool {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::Bool)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(ConversionError::of::<Self>(&other)),
        }
    }
}

impl Boxable for char {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::Char)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(ConversionError::of::<Self>(&other)),
        }
    }
}

macro_rules! impl_boxable_number {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Boxable for $ty {
            fn type_ref() -> TypeRef {
                type_ref_of::<Self>(TypeClass::Number(NumKind::$kind))
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::$kind(*self)
            }

            fn from_value(value: Value) -> Result<Self, ConversionError> {
                cast::<$ty>(&value, NumKind::$kind)
                    .ok_or_else(|| ConversionError::of::<Self>(&value))
            }
        }
    )*};
}

impl_boxable_number!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

impl Boxable for String {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::String)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(ConversionError::of::<Self>(&other)),
        }
    }
}

impl<T: Boxable> Boxable for Option<T> {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::Nullable).with_underlying(T::type_ref)
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Any + Send + Sync> Boxable for Arc<T> {
    fn type_ref() -> TypeRef {
        TypeRef::new::<Self>(TypeId::of::<T>(), ShortName::of::<T>(), TypeClass::Object)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(Object::new(Arc::clone(self)))
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Object(Object::new(self))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Object(object) => object
                .downcast::<T>()
                .map_err(|object| ConversionError::new(object.type_name(), ShortName::of::<T>())),
            other => Err(ConversionError::of::<Self>(&other)),
        }
    }
}

impl Boxable for Object {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::AnyObject)
    }

    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    #[inline]
    fn into_value(self) -> Value {
        Value::Object(self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(ConversionError::of::<Self>(&other)),
        }
    }
}

impl Boxable for Value {
    fn type_ref() -> TypeRef {
        type_ref_of::<Self>(TypeClass::Any)
    }

    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }

    #[inline]
    fn into_value(self) -> Value {
        self
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}
