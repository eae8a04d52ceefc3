#![doc = include_str!("../README.md")]

mod allocator;
mod entities;
mod error;
mod store;

pub use crate::allocator::*;
pub use crate::entities::*;
pub use crate::error::*;
pub use crate::store::*;
