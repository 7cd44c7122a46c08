#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use lb_access as access;
pub use lb_utils as utils;

pub use lb_access::{AccessError, AccessorCache, DynamicHandle, Value};
