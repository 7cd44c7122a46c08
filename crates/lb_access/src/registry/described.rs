use core::any::Any;

use crate::info::TypeInfo;
use crate::registry::TypeRegistry;

/// A type that knows how to describe its members.
///
/// # Examples
///
/// ```
/// use lb_access::info::{TypeInfo, Visibility};
/// use lb_access::registry::{Described, TypeRegistry};
///
/// #[derive(Default)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Described for Tag {
///     fn type_info() -> TypeInfo {
///         TypeInfo::builder::<Self>()
///             .field("label", Visibility::Public, |t| &t.label, |t| &mut t.label)
///             .default_constructor(Visibility::Public)
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Tag>();
/// assert!(registry.contains(core::any::TypeId::of::<Tag>()));
/// ```
pub trait Described: Any + Send + Sync {
    fn type_info() -> TypeInfo;

    /// Registers the types this one depends on.
    ///
    /// The base type set with [`TypeInfoBuilder::base`] is registered
    /// automatically and need not be listed here.
    ///
    /// [`TypeInfoBuilder::base`]: crate::info::TypeInfoBuilder::base
    #[inline(always)]
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

/// Submits types for [`TypeRegistry::auto_register`].
///
/// Every type must implement [`Described`]. Without the `auto_register`
/// feature the macro expands to nothing.
///
/// # Examples
///
/// ```
/// use lb_access::auto_register;
/// use lb_access::info::TypeInfo;
/// use lb_access::registry::{Described, TypeRegistry};
///
/// struct Marker;
///
/// impl Described for Marker {
///     fn type_info() -> TypeInfo {
///         TypeInfo::builder::<Self>().build()
///     }
/// }
///
/// auto_register!(Marker);
///
/// fn main() {
///     let mut registry = TypeRegistry::empty();
///     if registry.auto_register() {
///         assert!(registry.contains(core::any::TypeId::of::<Marker>()));
///     }
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::auto_register::inventory::submit! {
                $crate::__macro_exports::auto_register::AutoRegisterFunc(
                    $crate::__macro_exports::auto_register::register_type::<$ty>
                )
            }
        )+
    };
}

/// Submits types for [`TypeRegistry::auto_register`].
///
/// The `auto_register` feature is disabled, so this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
