/// Convenience result type used across the crate.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Top-level error taxonomy used by the captioning APIs.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// Font key is not part of the enumerated font set.
    #[error("invalid font choice: {0}")]
    InvalidFontChoice(String),

    /// Input bytes are not a valid/readable image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Output serialization failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// The fit loop ran out of tokens to drop without satisfying the
    /// width constraint.
    #[error("text cannot be fit: {0}")]
    Unfittable(String),

    /// Invalid user-provided arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build a [`CaptionError::InvalidFontChoice`] value.
    pub fn invalid_font(msg: impl Into<String>) -> Self {
        Self::InvalidFontChoice(msg.into())
    }

    /// Build a [`CaptionError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CaptionError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CaptionError::Unfittable`] value.
    pub fn unfittable(msg: impl Into<String>) -> Self {
        Self::Unfittable(msg.into())
    }

    /// Build a [`CaptionError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
