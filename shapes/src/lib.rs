//! Shapes

#[macro_use]
extern crate log;

mod mesh;
mod quad;
mod triangle;

// Re-export
pub use mesh::*;
pub use quad::*;
pub use triangle::*;
