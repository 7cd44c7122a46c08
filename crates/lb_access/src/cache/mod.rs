//! The process-wide accessor cache.
//!
//! An [`AccessorCache`] owns the frozen [`TypeRegistry`](crate::registry::TypeRegistry)
//! and memoizes every compiled accessor by its
//! [`MemberKey`](crate::registry::MemberKey). Entries are only ever added,
//! fully built, and the first stored entry wins when threads race.

// -----------------------------------------------------------------------------
// Modules

mod accessor_cache;
mod memo;

// -----------------------------------------------------------------------------
// Exports

pub use accessor_cache::{AccessKind, AccessorCache, CacheEntry};
