/// Convenience result type used across the crate.
pub type MorphResult<T> = Result<T, MorphError>;

/// Error taxonomy for the fallible edges of the crate.
///
/// The orchestration core itself (field generation, triggering, replaying, advancing the clock)
/// never fails; errors only arise from configuration, assets, outline parsing and surfaces.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// Invalid user-provided configuration or asset data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed animation data (keyframes, glyph outline).
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MorphError {
    /// Build a [`MorphError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MorphError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`MorphError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for MorphError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
