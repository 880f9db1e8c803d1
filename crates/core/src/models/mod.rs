//! Data models for Pulse

mod member;
mod role;
mod task;

pub use member::*;
pub use role::*;
pub use task::*;
