//! The type registry and the member descriptor resolver.
//!
//! A [`TypeRegistry`] stores one [`TypeInfo`](crate::info::TypeInfo) per type.
//! Its resolver methods turn a (type, member name, signature) request into a
//! [`MemberDescriptor`], the stable identity every compiler and the
//! [`AccessorCache`](crate::AccessorCache) key on.

// -----------------------------------------------------------------------------
// Modules

mod described;
mod descriptor;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use described::Described;
pub use descriptor::{MemberDescriptor, MemberKey, ParamKey};
pub use type_registry::TypeRegistry;

pub(crate) use descriptor::{Resolved, signature};
