/// Convenience result type used across the crate.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Geometric degeneracy (zero-length or NaN sphere points, samples outside a picture) is never
/// reported through this type: remapping treats it as "no contribution".
#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    /// Invalid user-provided data (dimensions, parameters, picture sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Unreadable or malformed configuration description.
    #[error("configuration error: {0}")]
    Config(String),

    /// Frame source or frame sink failure.
    #[error("media error: {0}")]
    Media(String),

    /// Quality metric that cannot be computed for the given inputs.
    #[error("metric error: {0}")]
    Metric(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayoutError {
    /// Build a [`LayoutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayoutError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayoutError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`LayoutError::Metric`] value.
    pub fn metric(msg: impl Into<String>) -> Self {
        Self::Metric(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
