/// Result alias used across the crate.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Error type for beatmap preparation, curve construction and frame rendering.
#[derive(thiserror::Error, Debug)]
pub enum PreviewError {
    /// Input data violates an invariant of the beatmap model or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A slider curve could not be built from its descriptor.
    #[error("curve error: {0}")]
    Curve(String),

    /// The raster surface could not be created or painted.
    #[error("render error: {0}")]
    Render(String),

    /// The audio transport rejected an operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PreviewError {
    /// Build a [`PreviewError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PreviewError::Curve`].
    pub fn curve(msg: impl Into<String>) -> Self {
        Self::Curve(msg.into())
    }

    /// Build a [`PreviewError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PreviewError::Transport`].
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`PreviewError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
