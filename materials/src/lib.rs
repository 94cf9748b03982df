//! Materials

#[macro_use]
extern crate log;

mod absorber;
mod common;
mod dielectric;
mod metal;

// Re-export
pub use absorber::*;
pub use common::*;
pub use dielectric::*;
pub use metal::*;
