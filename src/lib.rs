#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]
extern crate alloc;
mod config;
mod error;
mod factory;
mod pool;

pub use config::*;
pub use error::*;
pub use factory::*;
pub use pool::*;
