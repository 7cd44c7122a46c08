use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::cell::OnceCell;
use core::fmt;

use crate::info::TypeInfo;
use crate::value::{ShortName, TypeRef, Value};
use crate::{AccessError, AccessorCache};

use super::MemberTable;

/// A borrowed instance whose members are reached by name.
///
/// Created by [`AccessorCache::wrap`]. Every operation goes through the
/// cache, so repeated access compiles nothing.
pub struct DynamicHandle<'a> {
    cache: &'a AccessorCache,
    target: &'a mut dyn Any,
    type_id: TypeId,
    table: OnceCell<Arc<MemberTable>>,
}

impl<'a> DynamicHandle<'a> {
    pub(crate) fn new(cache: &'a AccessorCache, target: &'a mut dyn Any) -> Self {
        let type_id = Any::type_id(&*target);
        Self {
            cache,
            target,
            type_id,
            table: OnceCell::new(),
        }
    }

    fn table(&self) -> Arc<MemberTable> {
        let table = self.table.get_or_init(|| self.cache.member_table(self.type_id));
        Arc::clone(table)
    }

    /// Reads the most-derived field or property `name`, whatever its visibility.
    pub fn get(&self, name: &str) -> Result<Value, AccessError> {
        let table = self.table();
        let member = table.data_member(name).ok_or_else(|| table.not_found(name))?;
        self.cache.getter(member)?.get(Some(&*self.target))
    }

    /// Writes the most-derived field or property `name`, whatever its visibility.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        let table = self.table();
        let member = table.data_member(name).ok_or_else(|| table.not_found(name))?;
        self.cache.setter(member)?.set(Some(&mut *self.target), value)
    }

    /// Calls the overload of `name` that best fits the runtime types of `args`.
    ///
    /// `Ref` and `Out` arguments are written back as with
    /// [`Invoker::invoke`](crate::compile::Invoker::invoke).
    pub fn call(&mut self, name: &str, args: &mut [Value]) -> Result<Option<Value>, AccessError> {
        let table = self.table();
        let method = self.cache.resolve_call(&table, name, args)?;
        self.cache.invoker(&method)?.invoke(Some(&mut *self.target), args)
    }

    /// Calls the generic method `name` instantiated with `type_args`.
    pub fn call_generic(
        &mut self,
        name: &str,
        type_args: &[TypeRef],
        args: &mut [Value],
    ) -> Result<Option<Value>, AccessError> {
        let table = self.table();
        let open = table.generic_method(name).ok_or_else(|| table.not_found(name))?;
        let method = self.cache.registry().close_generic(open, type_args)?;
        self.cache.invoker(&method)?.invoke(Some(&mut *self.target), args)
    }

    /// The registered metadata of the wrapped instance.
    #[inline]
    pub fn type_info(&self) -> Option<&'a TypeInfo> {
        self.cache.registry().get(self.type_id)
    }

    pub fn type_name(&self) -> ShortName {
        self.table().type_name()
    }

    #[inline]
    pub fn target(&self) -> &dyn Any {
        &*self.target
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut dyn Any {
        &mut *self.target
    }
}

impl fmt::Debug for DynamicHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicHandle")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}
