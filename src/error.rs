//! Error types for cave generation and meshing

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A triangulation invariant was violated while building meshes.
    #[error("mesh invariant violated: {0}")]
    Mesh(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected configuration values, reported before any generation work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    DimensionTooSmall {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{field} plus twice the border must not exceed {max} (got {value})")]
    DimensionTooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("initial_density must lie in [0, 1] (got {0})")]
    DensityOutOfRange(f64),

    #[error("wall_threshold must be at most 8 (got {0})")]
    ThresholdOutOfRange(u8),

    #[error("tunnel_radius must not exceed the larger map side {max} (got {value})")]
    TunnelRadiusTooLarge { value: usize, max: usize },

    #[error("{field} must be a finite value greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("chunk_size must lie in [{min}, {max}] (got {value})")]
    ChunkSizeOutOfRange {
        value: usize,
        min: usize,
        max: usize,
    },
}

/// Standard Result type for the generator
pub type Result<T> = std::result::Result<T, Error>;
