/// Convenience result type used across stagecraft.
pub type StagecraftResult<T> = Result<T, StagecraftError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Animation specs, presets and layouts never produce errors: invalid input degrades to an
/// identity transform instead.
#[derive(thiserror::Error, Debug)]
pub enum StagecraftError {
    /// Invalid user-provided or fixture data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A performer asset failed to fetch or decode.
    #[error("load error: {0}")]
    Load(String),

    /// A performer failed to seek to a requested local time.
    #[error("seek error: {0}")]
    Seek(String),

    /// The render surface rejected an operation.
    #[error("surface error: {0}")]
    Surface(String),

    /// Capturing or encoding a canvas snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagecraftError {
    /// Build a [`StagecraftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StagecraftError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`StagecraftError::Seek`] value.
    pub fn seek(msg: impl Into<String>) -> Self {
        Self::Seek(msg.into())
    }

    /// Build a [`StagecraftError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`StagecraftError::Snapshot`] value.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Build a [`StagecraftError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
