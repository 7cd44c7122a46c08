//! Member access by name, with overloads picked from runtime argument types.
//!
//! [`AccessorCache::wrap`](crate::AccessorCache::wrap) turns any registered
//! instance into a [`DynamicHandle`]. Reads and writes go to the most-derived
//! field or property of the name. Calls pick the best overload for the
//! arguments actually passed:
//!
//! | argument vs. parameter                           | score |
//! |--------------------------------------------------|-------|
//! | same type                                        | 4     |
//! | assignable, e.g. anything to a `Value` parameter | 3     |
//! | `Null` to a nullable parameter                   | 2     |
//! | implicit numeric widening                        | 1     |
//! | output parameter                                 | 0     |
//!
//! The overload with the greatest total wins. Equal totals at the top are
//! reported as [`AccessError::AmbiguousOverload`](crate::AccessError::AmbiguousOverload)
//! rather than guessed.
//!
//! # Examples
//!
//! ```
//! use lb_access::info::{Method, TypeInfo, Visibility};
//! use lb_access::registry::TypeRegistry;
//! use lb_access::{AccessorCache, Value};
//!
//! #[derive(Default)]
//! struct Printer {
//!     prefix: String,
//! }
//!
//! let mut registry = TypeRegistry::empty();
//! registry.insert(
//!     TypeInfo::builder::<Printer>()
//!         .field("prefix", Visibility::Private, |p| &p.prefix, |p| &mut p.prefix)
//!         .method(
//!             Method::<Printer>::new("Print", Visibility::Private)
//!                 .param::<i64>("value")
//!                 .returns(|p, frame| Ok(format!("{}{}", p.prefix, frame.get::<i64>(0)?))),
//!         )
//!         .method(
//!             Method::<Printer>::new("Print", Visibility::Private)
//!                 .param::<String>("value")
//!                 .returns(|p, frame| Ok(format!("{}'{}'", p.prefix, frame.get::<String>(0)?))),
//!         )
//!         .build(),
//! );
//! let cache = AccessorCache::new(registry);
//!
//! let mut printer = Printer::default();
//! let mut handle = cache.wrap(&mut printer);
//! handle.set("prefix", Value::from("> ")).unwrap();
//!
//! // `i32` widens to `i64`.
//! let printed = handle.call("Print", &mut [Value::I32(7)]).unwrap();
//! assert_eq!(printed, Some(Value::from("> 7")));
//!
//! let printed = handle.call("Print", &mut [Value::from("seven")]).unwrap();
//! assert_eq!(printed, Some(Value::from("> 'seven'")));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod handle;
mod member_table;

pub(crate) mod call_shape;
pub(crate) mod overload;

// -----------------------------------------------------------------------------
// Exports

pub use handle::DynamicHandle;
pub use member_table::MemberTable;
