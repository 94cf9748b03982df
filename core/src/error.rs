//! Error types for scene assembly and coverage generation.

use thiserror::Error;

/// Usage errors reported when building a scene or starting a trace. Geometric
/// degeneracies encountered while tracing are misses, never errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TracerError {
    /// No geometry and no explicit coverage plane.
    #[error("Scene has no geometry and no coverage plane was given")]
    EmptyScene,

    /// Mesh buffers are malformed.
    #[error("Invalid mesh {mesh}: {reason}")]
    InvalidMesh {
        /// Mesh index or name.
        mesh: String,
        /// Reason for failure.
        reason: String,
    },

    /// Instance references a mesh that does not exist.
    #[error("Instance {instance} references missing mesh {mesh}")]
    MissingMesh {
        /// Instance index.
        instance: usize,
        /// Requested mesh index.
        mesh: usize,
    },

    /// Transform matrix cannot be inverted.
    #[error("Transform matrix is singular")]
    SingularTransform,

    /// TLAS child indices are packed in 16 bits.
    #[error("Too many instances for the top-level structure: {0} (max 32767)")]
    TooManyInstances(usize),

    /// Invalid coverage settings.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Failed to write an image.
    #[error("Image error: {0}")]
    Image(String),
}
