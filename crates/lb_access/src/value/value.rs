use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::value::{NumKind, Object, ShortName, TypeClass, TypeKey};

// -----------------------------------------------------------------------------
// Value

/// A boxed member value.
///
/// Getters return it, setters and invokers take it. Numbers keep their exact
/// width so the runtime type of an argument is known during overload resolution.
///
/// `Null` is the absence of a value. A void method returns no `Value` at all,
/// see [`Invoker::invoke`](crate::compile::Invoker::invoke).
///
/// # Examples
///
/// ```
/// use lb_access::Value;
///
/// let v = Value::from(42_i32);
/// assert_eq!(v.type_name().to_string(), "i32");
/// assert_eq!(v.runtime_type(), Some(core::any::TypeId::of::<i32>()));
///
/// assert!(Value::Null.is_null());
/// assert_eq!(Value::Null.runtime_type(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Object(Object),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Boxes an owned instance produced by a constructor.
    #[inline]
    pub fn from_boxed(value: Box<dyn Any + Send + Sync>, type_name: ShortName) -> Self {
        Self::Object(Object::from_boxed(value, type_name))
    }

    /// Returns the [`TypeId`] of the held value, `None` for `Null`.
    pub fn runtime_type(&self) -> Option<TypeId> {
        Some(match self {
            Self::Null => return None,
            Self::Bool(_) => TypeId::of::<bool>(),
            Self::Char(_) => TypeId::of::<char>(),
            Self::I8(_) => TypeId::of::<i8>(),
            Self::I16(_) => TypeId::of::<i16>(),
            Self::I32(_) => TypeId::of::<i32>(),
            Self::I64(_) => TypeId::of::<i64>(),
            Self::U8(_) => TypeId::of::<u8>(),
            Self::U16(_) => TypeId::of::<u16>(),
            Self::U32(_) => TypeId::of::<u32>(),
            Self::U64(_) => TypeId::of::<u64>(),
            Self::F32(_) => TypeId::of::<f32>(),
            Self::F64(_) => TypeId::of::<f64>(),
            Self::String(_) => TypeId::of::<String>(),
            Self::Object(object) => object.instance_type_id(),
        })
    }

    /// Returns the [`TypeKey`] of the held value, `None` for `Null`.
    ///
    /// Unlike [`runtime_type`](Self::runtime_type) this tells a `u64` apart
    /// from an object holding a `u64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lb_access::value::{NumKind, TypeClass};
    /// use lb_access::{Object, Value};
    ///
    /// let number = Value::U64(7);
    /// let object = Value::from(Object::new(Arc::new(7_u64)));
    ///
    /// assert_eq!(number.runtime_type(), object.runtime_type());
    /// assert_eq!(number.type_key().unwrap().class, TypeClass::Number(NumKind::U64));
    /// assert_eq!(object.type_key().unwrap().class, TypeClass::Object);
    /// ```
    pub fn type_key(&self) -> Option<TypeKey> {
        let class = match self {
            Self::Null => return None,
            Self::Bool(_) => TypeClass::Bool,
            Self::Char(_) => TypeClass::Char,
            Self::String(_) => TypeClass::String,
            Self::Object(_) => TypeClass::Object,
            _ => TypeClass::Number(self.num_kind()?),
        };
        Some(TypeKey::new(self.runtime_type()?, class))
    }

    /// Returns the name of the held value's type, `null` for `Null`.
    pub fn type_name(&self) -> ShortName {
        match self {
            Self::Null => ShortName::new("null"),
            Self::Bool(_) => ShortName::of::<bool>(),
            Self::Char(_) => ShortName::of::<char>(),
            Self::I8(_) => ShortName::of::<i8>(),
            Self::I16(_) => ShortName::of::<i16>(),
            Self::I32(_) => ShortName::of::<i32>(),
            Self::I64(_) => ShortName::of::<i64>(),
            Self::U8(_) => ShortName::of::<u8>(),
            Self::U16(_) => ShortName::of::<u16>(),
            Self::U32(_) => ShortName::of::<u32>(),
            Self::U64(_) => ShortName::of::<u64>(),
            Self::F32(_) => ShortName::of::<f32>(),
            Self::F64(_) => ShortName::of::<f64>(),
            Self::String(_) => ShortName::of::<String>(),
            Self::Object(object) => object.type_name(),
        }
    }

    /// Returns the numeric kind of the held value, if it is a number.
    pub const fn num_kind(&self) -> Option<NumKind> {
        Some(match self {
            Self::I8(_) => NumKind::I8,
            Self::I16(_) => NumKind::I16,
            Self::I32(_) => NumKind::I32,
            Self::I64(_) => NumKind::I64,
            Self::U8(_) => NumKind::U8,
            Self::U16(_) => NumKind::U16,
            Self::U32(_) => NumKind::U32,
            Self::U64(_) => NumKind::U64,
            Self::F32(_) => NumKind::F32,
            Self::F64(_) => NumKind::F64,
            _ => return None,
        })
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Borrows the instance behind an `Object` value.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object()?.downcast_ref::<T>()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("null"),
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::I8(v) => fmt::Display::fmt(v, f),
            Self::I16(v) => fmt::Display::fmt(v, f),
            Self::I32(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::U8(v) => fmt::Display::fmt(v, f),
            Self::U16(v) => fmt::Display::fmt(v, f),
            Self::U32(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::F32(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::String(v) => f.pad(v),
            Self::Object(object) => write!(f, "<{}>", object.type_name()),
        }
    }
}

// -----------------------------------------------------------------------------
// From

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    )*};
}

impl_from_primitive!(
    bool => Bool,
    char => Char,
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
    String => String,
    Object => Object,
);

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(String::from(value))
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for Value {
    #[inline]
    fn from(value: Arc<T>) -> Self {
        Self::Object(Object::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
