use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use crate::AccessError;
use crate::info::RawConstruct;
use crate::registry::{MemberDescriptor, Resolved, TypeRegistry};
use crate::value::{ShortName, Value};

struct ConstructorInner {
    descriptor: MemberDescriptor,
    raw: Arc<dyn RawConstruct>,
}

/// A compiled parameterless factory.
#[derive(Clone)]
pub struct Constructor(Arc<ConstructorInner>);

impl Constructor {
    #[inline]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.0.descriptor
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.0.descriptor.declaring()
    }

    #[inline]
    pub fn type_name(&self) -> ShortName {
        self.0.descriptor.declaring_name()
    }

    /// Creates a new default-initialized instance.
    #[inline]
    pub fn create(&self) -> Box<dyn Any + Send + Sync> {
        self.0.raw.construct()
    }

    /// Creates a new instance, boxed as an [`Object`](crate::Object) value.
    #[inline]
    pub fn create_value(&self) -> Value {
        Value::from_boxed(self.create(), self.type_name())
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({})", self.0.descriptor)
    }
}

/// Compiles the parameterless constructor of `type_id`, whatever its visibility.
///
/// Fails with [`AccessError::NoParameterlessConstructor`] if none was registered
/// or the type is abstract or an interface, and with [`AccessError::MemberNotFound`]
/// if the type is not registered.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use lb_access::compile::compile_constructor;
/// use lb_access::info::{TypeInfo, Visibility};
/// use lb_access::registry::TypeRegistry;
///
/// struct Token(u64);
///
/// let mut registry = TypeRegistry::empty();
/// registry.insert(
///     TypeInfo::builder::<Token>()
///         .constructor(Visibility::Private, || Token(42))
///         .build(),
/// );
///
/// let new = compile_constructor(&registry, TypeId::of::<Token>()).unwrap();
/// let token = new.create().downcast::<Token>().unwrap();
/// assert_eq!(token.0, 42);
/// ```
pub fn compile_constructor(
    registry: &TypeRegistry,
    type_id: TypeId,
) -> Result<Constructor, AccessError> {
    let descriptor = registry.constructor(type_id)?;
    let Some(Resolved::Constructor(constructor)) = registry.resolve(descriptor.key()) else {
        return Err(descriptor.not_found());
    };
    log::debug!("compiled constructor for `{descriptor}`");
    Ok(Constructor(Arc::new(ConstructorInner {
        raw: Arc::clone(constructor.raw()),
        descriptor,
    })))
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::any::TypeId;

    use super::compile_constructor;
    use crate::AccessError;
    use crate::fixtures::{Abstract, Echo, Hidden, NoCtor, Shape, registry};

    #[test]
    fn creates_fresh_instances() {
        let registry = registry();
        let new = compile_constructor(&registry, TypeId::of::<Echo>()).unwrap();
        let a = new.create().downcast::<Echo>().unwrap();
        let b = new.create_value();
        assert_eq!(a.name, "");
        assert_eq!(b.type_name().to_string(), "Echo");
        assert!(b.downcast_ref::<Echo>().is_some());
    }

    #[test]
    fn private_constructor_compiles() {
        let registry = registry();
        let new = compile_constructor(&registry, TypeId::of::<Hidden>()).unwrap();
        assert!(new.create().downcast::<Hidden>().unwrap().created);
    }

    #[test]
    fn missing_constructors() {
        let registry = registry();
        for type_id in [
            TypeId::of::<NoCtor>(),
            TypeId::of::<Abstract>(),
            TypeId::of::<dyn Shape>(),
        ] {
            assert!(matches!(
                compile_constructor(&registry, type_id),
                Err(AccessError::NoParameterlessConstructor { .. })
            ));
        }
        assert!(matches!(
            compile_constructor(&registry, TypeId::of::<u8>()),
            Err(AccessError::MemberNotFound { .. })
        ));
    }
}
