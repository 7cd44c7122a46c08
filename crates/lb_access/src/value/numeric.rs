use core::fmt;

use num_traits::{NumCast, ToPrimitive};

use crate::value::Value;

// -----------------------------------------------------------------------------
// NumKind

/// The numeric types a [`Value`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NumKind {
    #[inline]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::F32 | Self::F64)
    }

    /// Whether every value of `self` converts to `to` implicitly.
    ///
    /// Integers widen to larger integers of a compatible sign and to any float,
    /// `f32` widens to `f64`. A kind does not widen to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_access::value::NumKind;
    ///
    /// assert!(NumKind::I32.widens_to(NumKind::I64));
    /// assert!(NumKind::U8.widens_to(NumKind::I16));
    /// assert!(!NumKind::I8.widens_to(NumKind::U64));
    /// assert!(!NumKind::F64.widens_to(NumKind::F32));
    /// ```
    pub const fn widens_to(self, to: NumKind) -> bool {
        use NumKind::*;
        match self {
            I8 => matches!(to, I16 | I32 | I64 | F32 | F64),
            I16 => matches!(to, I32 | I64 | F32 | F64),
            I32 => matches!(to, I64 | F32 | F64),
            I64 | U64 => matches!(to, F32 | F64),
            U8 => matches!(to, I16 | U16 | I32 | U32 | I64 | U64 | F32 | F64),
            U16 => matches!(to, I32 | U32 | I64 | U64 | F32 | F64),
            U32 => matches!(to, I64 | U64 | F32 | F64),
            F32 => matches!(to, F64),
            F64 => false,
        }
    }
}

impl fmt::Display for NumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        })
    }
}

// -----------------------------------------------------------------------------
// Checked casts

/// Converts a numeric [`Value`] into `T`, widening or narrowing.
///
/// Returns `None` for non-numeric values, out of range values,
/// and floats with a fractional part when `T` is an integer.
pub(crate) fn cast<T>(value: &Value, to: NumKind) -> Option<T>
where
    T: NumCast + ToPrimitive + Copy,
{
    match *value {
        Value::I8(v) => NumCast::from(v),
        Value::I16(v) => NumCast::from(v),
        Value::I32(v) => NumCast::from(v),
        Value::I64(v) => NumCast::from(v),
        Value::U8(v) => NumCast::from(v),
        Value::U16(v) => NumCast::from(v),
        Value::U32(v) => NumCast::from(v),
        Value::U64(v) => NumCast::from(v),
        Value::F32(v) => cast_float(<f64 as From<f32>>::from(v), to),
        Value::F64(v) => cast_float(v, to),
        _ => None,
    }
}

fn cast_float<T>(v: f64, to: NumKind) -> Option<T>
where
    T: NumCast + ToPrimitive + Copy,
{
    let out: T = NumCast::from(v)?;
    if to.is_integer() && out.to_f64()? != v {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::{NumKind, cast};
    use crate::value::Value;

    #[test]
    fn narrowing_checks_range() {
        assert_eq!(cast::<u8>(&Value::I64(200), NumKind::U8), Some(200));
        assert_eq!(cast::<u8>(&Value::I64(300), NumKind::U8), None);
        assert_eq!(cast::<i8>(&Value::U32(127), NumKind::I8), Some(127));
        assert_eq!(cast::<u32>(&Value::I32(-1), NumKind::U32), None);
    }

    #[test]
    fn floats_to_integers_must_be_whole() {
        assert_eq!(cast::<i32>(&Value::F64(4.0), NumKind::I32), Some(4));
        assert_eq!(cast::<i32>(&Value::F64(4.5), NumKind::I32), None);
        assert_eq!(cast::<f32>(&Value::F64(0.1), NumKind::F32), Some(0.1_f32));
    }

    #[test]
    fn non_numbers_never_cast() {
        assert_eq!(cast::<i32>(&Value::Bool(true), NumKind::I32), None);
        assert_eq!(cast::<i32>(&Value::Null, NumKind::I32), None);
    }
}
