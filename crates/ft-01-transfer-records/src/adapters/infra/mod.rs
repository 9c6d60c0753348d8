//! Infrastructure Adapters
//!
//! Implementations of infrastructure traits (Time, Identifiers).

mod id;
mod time;

pub use id::{SequentialIdGenerator, UuidGenerator};
pub use time::{ManualTimeSource, SystemTimeSource};
