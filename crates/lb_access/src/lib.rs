#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// The accessor cache needs `RwLock`, so `std` is always linked.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod cache;
pub mod compile;
pub mod dynamic;
pub mod info;
pub mod registry;
pub mod value;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use cache::AccessorCache;
pub use dynamic::DynamicHandle;
pub use error::{AccessError, TargetFound};
pub use value::{Boxable, ConversionError, Object, ShortName, TypeRef, Value};
