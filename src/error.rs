//! Error type shared by learning, persistence, and the I/O helpers.
use std::path::Path;

/// Failures surfaced by the crate.
///
/// Out-of-bounds votes are not represented here: they are discarded silently
/// by the accumulator.
#[derive(Clone, Debug, PartialEq)]
pub enum GhtError {
    /// The reference edge map carries zero total gradient magnitude.
    EmptyShape,
    /// Model bytes are malformed, truncated, or internally inconsistent.
    Serialization(String),
    /// An input image could not be read or decoded.
    Decode { path: String, message: String },
    /// An output image could not be encoded or written.
    Encode { path: String, message: String },
    /// Filesystem failure outside image codecs (model files, reports).
    Io { path: String, message: String },
    /// Buffers or parameters that violate a documented precondition.
    InvalidInput(String),
}

impl GhtError {
    pub(crate) fn decode(path: &Path, err: impl std::fmt::Display) -> Self {
        GhtError::Decode {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(path: &Path, err: impl std::fmt::Display) -> Self {
        GhtError::Encode {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        GhtError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for GhtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GhtError::EmptyShape => write!(f, "no edges detected in reference shape"),
            GhtError::Serialization(msg) => write!(f, "invalid r-table data: {msg}"),
            GhtError::Decode { path, message } => write!(f, "failed to open {path}: {message}"),
            GhtError::Encode { path, message } => write!(f, "failed to save {path}: {message}"),
            GhtError::Io { path, message } => write!(f, "I/O error on {path}: {message}"),
            GhtError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for GhtError {}

pub type Result<T> = std::result::Result<T, GhtError>;
