//! Registered member metadata.
//!
//! Rust has no runtime reflection, so every participating type describes
//! itself once with a [`TypeInfoBuilder`]. The builder erases member types
//! behind the `Raw*` traits, so the registry stores plain [`TypeInfo`]s.
//!
//! ## Menu
//!
//! - [`TypeInfo`]: the members, base type and constructor of one type.
//! - [`FieldInfo`], [`PropertyInfo`]: data members.
//! - [`MethodInfo`], [`GenericMethodInfo`]: callable members, built with
//!   [`Method`], [`StaticMethod`] and [`GenericMethod`].
//! - [`ConstructorInfo`]: a parameterless factory.
//! - [`BaseInfo`]: the embedded base type, reached through an upcast.
//!
//! # Examples
//!
//! ```
//! use lb_access::info::{Method, Property, TypeInfo, Visibility};
//!
//! #[derive(Default)]
//! struct Counter {
//!     hits: u32,
//! }
//!
//! let info = TypeInfo::builder::<Counter>()
//!     .field("hits", Visibility::Private, |c| &c.hits, |c| &mut c.hits)
//!     .property(Property::new("Doubled", Visibility::Public, |c: &Counter| c.hits * 2))
//!     .method(
//!         Method::<Counter>::new("Hit", Visibility::Public)
//!             .returns_void(|c, _| {
//!                 c.hits += 1;
//!                 Ok(())
//!             }),
//!     )
//!     .default_constructor(Visibility::Public)
//!     .build();
//!
//! assert!(info.field("hits").is_some());
//! assert!(info.property("Doubled").is_some());
//! assert_eq!(info.methods_named("Hit").count(), 1);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod base_info;
mod constructor_info;
mod field_info;
mod method_info;
mod property_info;
mod type_info;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use base_info::{BaseInfo, RawUpcast};
pub use constructor_info::{ConstructorInfo, RawConstruct};
pub use field_info::{FieldInfo, RawGet, RawSet};
pub use method_info::{GenericMethod, GenericMethodInfo, Method, MethodInfo, StaticMethod};
pub use method_info::{ParamInfo, ParamMode, RawMethod};
pub use property_info::{Property, PropertyInfo, StaticProperty};
pub use type_info::{TypeInfo, TypeInfoBuilder};
pub use visibility::{MemberKind, TypeKind, Visibility};
