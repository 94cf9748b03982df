//! Integrators

#[macro_use]
extern crate log;

mod coverage;
mod tracer;

// Re-export.
pub use coverage::*;
pub use tracer::*;
