//! Error types for fitting, filtering, and deformation operations.

use thiserror::Error;

/// Result type alias for shell fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Errors that can occur while fitting a cylinder or deriving deformation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// A coordinate was not a finite number.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The operation requires at least one point.
    #[error("point collection is empty")]
    EmptyInput,

    /// A point coincides with the fit center, or a radius is not positive.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The normal-equations matrix could not be inverted.
    #[error("singular normal equations: {0}")]
    SingularSystem(String),

    /// A name is already registered.
    #[error("name already registered: {0}")]
    NameCollision(String),

    /// A configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A point has not been annotated with a deformation value.
    #[error("point at index {index} has no deformation value")]
    MissingDeformation {
        /// Position of the point in its collection.
        index: usize,
    },
}

impl FitError {
    /// Create an invalid coordinate error.
    #[must_use]
    pub fn invalid_coordinate(details: impl Into<String>) -> Self {
        Self::InvalidCoordinate(details.into())
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateGeometry(details.into())
    }

    /// Create a singular system error.
    #[must_use]
    pub fn singular(details: impl Into<String>) -> Self {
        Self::SingularSystem(details.into())
    }

    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(details: impl Into<String>) -> Self {
        Self::InvalidParameter(details.into())
    }
}
