//! Shared primitive types.
mod event;
pub use event::*;

mod immutables;
pub use immutables::*;

mod msg;
pub use msg::*;

mod timelocks;
pub use timelocks::*;
