//! The uniform boxed value representation.
//!
//! ## Menu
//!
//! - [`Value`]: what getters return, setters accept and invokers pass around.
//! - [`Object`]: a shared, type-erased reference-typed instance.
//! - [`Boxable`]: conversion between a Rust type and [`Value`].
//! - [`TypeRef`]: the declared type of a field, property, parameter or return value.
//! - [`NumKind`]: the numeric types, with their implicit widening rules.
//!
//! Reference-typed members are declared as `Arc<T>`, nullable ones as `Option<T>`.
//! A member declared as [`Value`] accepts anything, like an `object` slot.

// -----------------------------------------------------------------------------
// Modules

mod boxable;
mod numeric;
mod object;
mod short_name;
mod type_ref;
mod value;

#[cfg(feature = "serde")]
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use boxable::Boxable;
pub use numeric::NumKind;
pub use object::Object;
pub use short_name::ShortName;
pub use type_ref::{ConversionError, TypeClass, TypeKey, TypeRef};
pub use value::Value;
