use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, TypeId};

use lb_utils::TypeIdMap;

use crate::info::RawUpcast;
use crate::registry::{MemberDescriptor, TypeRegistry};
use crate::value::ShortName;
use crate::{AccessError, TargetFound};

type UpcastTable = TypeIdMap<Box<[Arc<dyn RawUpcast>]>>;

/// How a compiled member finds its declaring type in the target it is given.
#[derive(Clone)]
pub(crate) enum TargetBinding {
    /// The target is ignored.
    Static,
    Instance {
        member: Arc<str>,
        declaring: TypeId,
        declaring_name: ShortName,
        /// The upcast chain of every registered derived type.
        upcasts: Arc<UpcastTable>,
    },
}

impl TargetBinding {
    /// Walks every registered type once to collect the ones deriving from the
    /// declaring type, so binding costs O(registered types) at compile time.
    pub(crate) fn new(registry: &TypeRegistry, descriptor: &MemberDescriptor) -> Self {
        if descriptor.is_static() {
            return Self::Static;
        }
        let declaring = descriptor.declaring();
        let mut upcasts = UpcastTable::new();
        for info in registry.iter().filter(|info| info.id() != declaring) {
            if let Some(path) = registry.upcast_path(info.id(), declaring) {
                upcasts.insert(info.id(), path.into_boxed_slice());
            }
        }
        Self::Instance {
            member: Arc::from(format!("{descriptor}")),
            declaring,
            declaring_name: descriptor.declaring_name(),
            upcasts: Arc::new(upcasts),
        }
    }

    fn invalid(member: &str, expected: ShortName, found: TargetFound) -> AccessError {
        AccessError::InvalidTarget {
            member: String::from(member),
            expected,
            found,
        }
    }

    /// Borrows the declaring-type part of `target`.
    ///
    /// Returns `None` for static members.
    pub(crate) fn bind<'a>(
        &self,
        target: Option<&'a dyn Any>,
    ) -> Result<Option<&'a dyn Any>, AccessError> {
        let Self::Instance {
            member,
            declaring,
            declaring_name,
            upcasts,
        } = self
        else {
            return Ok(None);
        };
        let Some(target) = target else {
            return Err(Self::invalid(member, *declaring_name, TargetFound::Missing));
        };
        let unrelated = || Self::invalid(member, *declaring_name, TargetFound::Unrelated);

        let runtime = Any::type_id(target);
        if runtime == *declaring {
            return Ok(Some(target));
        }
        let path = upcasts.get(&runtime).ok_or_else(unrelated)?;
        let mut current = target;
        for step in path.iter() {
            current = step.upcast(current).ok_or_else(unrelated)?;
        }
        Ok(Some(current))
    }

    /// Mutable version of [`bind`](Self::bind).
    pub(crate) fn bind_mut<'a>(
        &self,
        target: Option<&'a mut dyn Any>,
    ) -> Result<Option<&'a mut dyn Any>, AccessError> {
        let Self::Instance {
            member,
            declaring,
            declaring_name,
            upcasts,
        } = self
        else {
            return Ok(None);
        };
        let Some(target) = target else {
            return Err(Self::invalid(member, *declaring_name, TargetFound::Missing));
        };
        let unrelated = || Self::invalid(member, *declaring_name, TargetFound::Unrelated);

        let runtime = Any::type_id(&*target);
        if runtime == *declaring {
            return Ok(Some(target));
        }
        let path = upcasts.get(&runtime).ok_or_else(unrelated)?;
        let mut current = target;
        for step in path.iter() {
            current = step.upcast_mut(current).ok_or_else(unrelated)?;
        }
        Ok(Some(current))
    }
}
