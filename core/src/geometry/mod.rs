//! Geometry

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3f {
                vector3(x, y, z)
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_point3 {
    ($name: ident, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Point3f {
                point3(x, y, z)
            }
        }
    };
}

mod bounds3;
mod common;
mod interval;
mod matrix4x4;
mod normal3;
mod point3;
mod ray;
mod transform;
mod vector3;

// Re-export
pub use bounds3::*;
pub use common::*;
pub use interval::*;
pub use matrix4x4::*;
pub use normal3::*;
pub use point3::*;
pub use ray::*;
pub use transform::*;
pub use vector3::*;
