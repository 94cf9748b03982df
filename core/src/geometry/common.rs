//! Common

use crate::base::Float;

/// Dot product between vectors and normals.
pub trait Dot<V> {
    /// Returns the dot product.
    ///
    /// * `other` - The other vector/normal.
    fn dot(&self, other: &V) -> Float;
}

/// Union trait allows union between two objects.
pub trait Union<T> {
    /// Return the result of a union with an another object of type `T`.
    ///
    /// * `other` - The other object.
    fn union(&self, other: &T) -> Self;
}

/// Intersect trait allows intersection between objects.
pub trait Intersect<T> {
    /// Return the result of an intersection with an another object of type `T`.
    ///
    /// * `other` - The other object.
    fn intersect(&self, other: &T) -> Self;
}
