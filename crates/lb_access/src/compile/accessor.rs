use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::{RawGet, RawSet};
use crate::registry::{MemberDescriptor, Resolved, TypeRegistry};
use crate::value::{TypeRef, Value};
use crate::{AccessError, TargetFound};

use super::target::TargetBinding;

fn unrelated(descriptor: &MemberDescriptor) -> AccessError {
    AccessError::InvalidTarget {
        member: descriptor.to_string(),
        expected: descriptor.declaring_name(),
        found: TargetFound::Unrelated,
    }
}

// -----------------------------------------------------------------------------
// Getter

struct GetterInner {
    descriptor: MemberDescriptor,
    target: TargetBinding,
    raw: Arc<dyn RawGet>,
}

/// A compiled read of a field or property.
#[derive(Clone)]
pub struct Getter(Arc<GetterInner>);

impl Getter {
    #[inline]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.0.descriptor
    }

    /// Whether both handles share one compiled accessor.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Reads the member of `target`.
    ///
    /// Instance members need a target of the declaring type or of a type
    /// deriving from it. Static members ignore `target`.
    pub fn get(&self, target: Option<&dyn Any>) -> Result<Value, AccessError> {
        let inner = &*self.0;
        let target = inner.target.bind(target)?;
        inner.raw.get(target).ok_or_else(|| unrelated(&inner.descriptor))
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Getter({})", self.0.descriptor)
    }
}

/// Compiles a read of the field or property `descriptor`, whatever its visibility.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use lb_access::compile::compile_getter;
/// use lb_access::info::{TypeInfo, Visibility};
/// use lb_access::registry::TypeRegistry;
/// use lb_access::Value;
///
/// struct Secretive {
///     code: i32,
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.insert(
///     TypeInfo::builder::<Secretive>()
///         .field("code", Visibility::Private, |s| &s.code, |s| &mut s.code)
///         .build(),
/// );
///
/// let code = registry.field(TypeId::of::<Secretive>(), "code").unwrap();
/// let getter = compile_getter(&registry, &code).unwrap();
///
/// assert_eq!(getter.get(Some(&Secretive { code: 7 })), Ok(Value::I32(7)));
/// assert!(getter.get(None).is_err());
/// ```
pub fn compile_getter(
    registry: &TypeRegistry,
    descriptor: &MemberDescriptor,
) -> Result<Getter, AccessError> {
    let raw = match registry.resolve(descriptor.key()) {
        Some(Resolved::Field(field)) => Arc::clone(field.raw_get()),
        Some(Resolved::Property(property)) => Arc::clone(property.raw_get()),
        _ => return Err(descriptor.not_found()),
    };
    log::debug!("compiled getter for `{descriptor}`");
    Ok(Getter(Arc::new(GetterInner {
        descriptor: descriptor.clone(),
        target: TargetBinding::new(registry, descriptor),
        raw,
    })))
}

// -----------------------------------------------------------------------------
// Setter

struct SetterInner {
    descriptor: MemberDescriptor,
    target: TargetBinding,
    raw: Arc<dyn RawSet>,
}

/// A compiled write of a field or property.
#[derive(Clone)]
pub struct Setter(Arc<SetterInner>);

impl Setter {
    #[inline]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.0.descriptor
    }

    /// The declared type values are converted to.
    #[inline]
    pub fn value_type(&self) -> Option<TypeRef> {
        self.0.descriptor.value_type()
    }

    /// Writes `value` into the member of `target`.
    ///
    /// The target rules are the ones of [`Getter::get`]. `value` is converted
    /// to the declared type first, with a range check for numbers.
    pub fn set(&self, target: Option<&mut dyn Any>, value: Value) -> Result<(), AccessError> {
        let inner = &*self.0;
        let target = inner.target.bind_mut(target)?;
        inner
            .raw
            .set(target, value)
            .ok_or_else(|| unrelated(&inner.descriptor))?
            .map_err(AccessError::from)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Setter({})", self.0.descriptor)
    }
}

/// Compiles a write of the field or property `descriptor`, whatever its visibility.
///
/// Fails with [`AccessError::NoSetter`] for a get-only property.
pub fn compile_setter(
    registry: &TypeRegistry,
    descriptor: &MemberDescriptor,
) -> Result<Setter, AccessError> {
    let raw = match registry.resolve(descriptor.key()) {
        Some(Resolved::Field(field)) => Arc::clone(field.raw_set()),
        Some(Resolved::Property(property)) => match property.raw_set() {
            Some(raw) => Arc::clone(raw),
            None => {
                return Err(AccessError::NoSetter {
                    member: descriptor.to_string(),
                });
            }
        },
        _ => return Err(descriptor.not_found()),
    };
    log::debug!("compiled setter for `{descriptor}`");
    Ok(Setter(Arc::new(SetterInner {
        descriptor: descriptor.clone(),
        target: TargetBinding::new(registry, descriptor),
        raw,
    })))
}
