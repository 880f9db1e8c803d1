//! Derived views
//!
//! Pure functions over a [`crate::Snapshot`] (or slices of it). Nothing here
//! is cached; every call recomputes from the data it is given. Functions
//! that depend on the current time take it as `now`.

mod calendar;
mod dashboard;
mod members;
mod status;
mod tasks;

pub use calendar::*;
pub use dashboard::*;
pub use members::*;
pub use status::*;
pub use tasks::*;
