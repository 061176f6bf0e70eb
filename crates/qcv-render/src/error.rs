//! Error types for the render crate.

use thiserror::Error;

/// Errors produced while drawing or encoding an image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Requested image exceeds the pixel limit.
    #[error("image of {width}x{height} pixels exceeds the {max}-pixel area limit")]
    TooLarge {
        /// Requested width.
        width: u64,
        /// Requested height.
        height: u64,
        /// Largest accepted area.
        max: u64,
    },

    /// A plot series has mismatched coordinate vectors.
    #[error("series '{label}' has {xs} x values but {ys} y values")]
    SeriesLengthMismatch {
        /// Series label.
        label: String,
        /// Number of x values.
        xs: usize,
        /// Number of y values.
        ys: usize,
    },

    /// PNG encoding or file write failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
