#![doc = include_str!("../README.md")]

mod channel;
mod collect;
mod error;
mod partition;
mod primality;
mod record;
mod stats;

pub use crate::channel::*;
pub use crate::collect::*;
pub use crate::error::*;
pub use crate::partition::*;
pub use crate::primality::*;
pub use crate::record::*;
pub use crate::stats::*;
