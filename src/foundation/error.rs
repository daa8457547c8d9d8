/// Convenience result type used across filekit.
pub type FilekitResult<T> = Result<T, FilekitError>;

/// Top-level error taxonomy used by kit, storage and processor APIs.
#[derive(thiserror::Error, Debug)]
pub enum FilekitError {
    /// A source file (or a kit) with the requested name does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The storage backend could not persist bytes.
    #[error("storage write error: {0}")]
    StorageWrite(String),

    /// A processor could not transform its input.
    #[error("processor error: {0}")]
    Processor(String),

    /// Invalid kit, field, processor or registry definition.
    #[error("configuration error: {0}")]
    Config(String),

    /// The upload was rejected by the collection's extension allow-list.
    #[error("upload not allowed: {0}")]
    NotAllowed(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilekitError {
    /// Build a [`FilekitError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`FilekitError::StorageWrite`] value.
    pub fn storage_write(msg: impl Into<String>) -> Self {
        Self::StorageWrite(msg.into())
    }

    /// Build a [`FilekitError::Processor`] value.
    pub fn processor(msg: impl Into<String>) -> Self {
        Self::Processor(msg.into())
    }

    /// Build a [`FilekitError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FilekitError::NotAllowed`] value.
    pub fn not_allowed(msg: impl Into<String>) -> Self {
        Self::NotAllowed(msg.into())
    }

    /// `true` for lookup failures that a host should report as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
