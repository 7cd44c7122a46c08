use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::Visibility;

/// A type-erased parameterless factory.
pub trait RawConstruct: Send + Sync + 'static {
    fn construct(&self) -> Box<dyn Any + Send + Sync>;
}

struct FnConstruct<T>(fn() -> T);

impl<T: Any + Send + Sync> RawConstruct for FnConstruct<T> {
    #[inline]
    fn construct(&self) -> Box<dyn Any + Send + Sync> {
        Box::new((self.0)())
    }
}

/// A registered parameterless constructor.
#[derive(Clone)]
pub struct ConstructorInfo {
    visibility: Visibility,
    raw: Arc<dyn RawConstruct>,
}

impl ConstructorInfo {
    #[inline]
    pub(crate) fn new<T: Any + Send + Sync>(visibility: Visibility, f: fn() -> T) -> Self {
        Self {
            visibility,
            raw: Arc::new(FnConstruct(f)),
        }
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn raw(&self) -> &Arc<dyn RawConstruct> {
        &self.raw
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}
