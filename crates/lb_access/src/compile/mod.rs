//! Compilers turning a [`MemberDescriptor`](crate::registry::MemberDescriptor)
//! into a reusable accessor.
//!
//! Compiling resolves the member's metadata once and pre-computes how every
//! registered derived type reaches the declaring type, so each call only
//! checks its target and converts its values.
//!
//! ## Menu
//!
//! - [`compile_getter`], [`compile_setter`]: field and property access.
//! - [`compile_constructor`]: parameterless factories.
//! - [`compile_method`]: method invokers with by-reference and output write-back.
//!
//! Every compiled handle is an `Arc` inside, cheap to clone and safe to call
//! from many threads.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod constructor;
mod frame;
mod method;
mod target;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{Getter, Setter, compile_getter, compile_setter};
pub use constructor::{Constructor, compile_constructor};
pub use frame::Frame;
pub use method::{Invoker, compile_method};
