//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod base;
pub mod coverage_map;
pub mod error;
pub mod geometry;
pub mod image_io;
pub mod interaction;
pub mod material;
pub mod path;
pub mod primitive;
pub mod propagation;
pub mod radio;
pub mod rng;
pub mod sampling;
