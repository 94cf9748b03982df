//! Ray intersection acceleration data structures.

#[macro_use]
extern crate log;

mod bvh;
mod instance;
mod tlas;

// Re-export
pub use bvh::*;
pub use instance::*;
pub use tlas::*;
