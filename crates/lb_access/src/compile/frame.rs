use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::mem;

use crate::AccessError;
use crate::info::{ParamInfo, ParamMode};
use crate::value::{Boxable, Value};

/// The arguments of one method call, as seen by the method body.
///
/// Every slot already holds a value of its declared parameter type. Output
/// slots start as `Null`. Whatever the body leaves in a by-reference or
/// output slot is copied back to the caller's arguments after the call.
#[derive(Debug)]
pub struct Frame {
    slots: Vec<Value>,
    params: Arc<[ParamInfo]>,
}

impl Frame {
    /// Coerces `args` into a new frame, leaving `args` untouched.
    pub(crate) fn prepare(params: &Arc<[ParamInfo]>, args: &[Value]) -> Result<Self, AccessError> {
        let mut slots = Vec::with_capacity(params.len());
        for (param, arg) in params.iter().zip(args) {
            let slot = match param.mode() {
                ParamMode::Out => Value::Null,
                _ => param.ty().coerce(arg.clone())?,
            };
            slots.push(slot);
        }
        Ok(Self {
            slots,
            params: Arc::clone(params),
        })
    }

    /// Copies by-reference and output slots back into `args`.
    pub(crate) fn write_back(mut self, args: &mut [Value]) {
        for ((param, slot), arg) in self.params.iter().zip(&mut self.slots).zip(args) {
            if param.mode().writes_back() {
                *arg = mem::take(slot);
            }
        }
    }

    fn out_of_range(&self, index: usize) -> AccessError {
        AccessError::ArityMismatch {
            member: String::from("<frame>"),
            expected: self.slots.len(),
            actual: index + 1,
        }
    }

    /// The number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reads argument `index` as an `A`.
    pub fn get<A: Boxable>(&self, index: usize) -> Result<A, AccessError> {
        let value = self.value(index)?.clone();
        Ok(A::from_value(value)?)
    }

    /// Borrows argument `index` as it was coerced.
    pub fn value(&self, index: usize) -> Result<&Value, AccessError> {
        self.slots.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// Assigns argument `index`, converted to its declared type.
    pub fn set<A: Boxable>(&mut self, index: usize, value: A) -> Result<(), AccessError> {
        self.set_value(index, value.into_value())
    }

    pub fn set_value(&mut self, index: usize, value: Value) -> Result<(), AccessError> {
        let Some(param) = self.params.get(index) else {
            return Err(self.out_of_range(index));
        };
        let value = param.ty().coerce(value)?;
        self.slots[index] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use super::Frame;
    use crate::AccessError;
    use crate::info::{ParamInfo, ParamMode};
    use crate::value::{TypeRef, Value};

    fn params() -> Arc<[ParamInfo]> {
        Arc::from(vec![
            ParamInfo::new("a", TypeRef::of::<i64>(), ParamMode::Value),
            ParamInfo::new("b", TypeRef::of::<String>(), ParamMode::Ref),
            ParamInfo::new("c", TypeRef::of::<i32>(), ParamMode::Out),
        ])
    }

    #[test]
    fn prepare_coerces_and_clears_outputs() {
        let args = [Value::I8(3), Value::from("x"), Value::from("placeholder")];
        let frame = Frame::prepare(&params(), &args).unwrap();
        assert_eq!(frame.value(0), Ok(&Value::I64(3)));
        assert_eq!(frame.value(2), Ok(&Value::Null));
        assert!(matches!(frame.value(3), Err(AccessError::ArityMismatch { .. })));
    }

    #[test]
    fn write_back_skips_by_value_slots() {
        let mut args = [Value::I64(1), Value::from("x"), Value::Null];
        let mut frame = Frame::prepare(&params(), &args).unwrap();
        frame.set(0, 99_i64).unwrap();
        frame.set(1, String::from("y")).unwrap();
        frame.set(2, 7_u8).unwrap();
        frame.write_back(&mut args);
        assert_eq!(args, [Value::I64(1), Value::from("y"), Value::I32(7)]);
    }

    #[test]
    fn set_checks_declared_type() {
        let args = [Value::I64(1), Value::from("x"), Value::Null];
        let mut frame = Frame::prepare(&params(), &args).unwrap();
        assert!(matches!(
            frame.set(2, String::from("nope")),
            Err(AccessError::ValueConversion(_))
        ));
    }
}
