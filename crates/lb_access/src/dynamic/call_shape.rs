use alloc::boxed::Box;
use core::any::TypeId;

use lb_utils::hash::hashbrown::Equivalent;

use crate::value::TypeKey;

/// The key an overload choice is remembered under.
///
/// Holds the [`TypeKey`] of every argument, `None` for a `Null` one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CallShape {
    type_id: TypeId,
    name: Box<str>,
    args: Box<[Option<TypeKey>]>,
}

/// A borrowed [`CallShape`], for lookups without allocating.
///
/// Hashes exactly like the owned form.
#[derive(Hash)]
pub(crate) struct ShapeRef<'a> {
    pub type_id: TypeId,
    pub name: &'a str,
    pub args: &'a [Option<TypeKey>],
}

impl ShapeRef<'_> {
    pub(crate) fn to_shape(&self) -> CallShape {
        CallShape {
            type_id: self.type_id,
            name: Box::from(self.name),
            args: Box::from(self.args),
        }
    }
}

impl Equivalent<CallShape> for ShapeRef<'_> {
    fn equivalent(&self, key: &CallShape) -> bool {
        self.type_id == key.type_id && self.name == &*key.name && self.args == &*key.args
    }
}
