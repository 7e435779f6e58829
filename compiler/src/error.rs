use thiserror::Error;

/// Failures that stop a whole generation request.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode request: {0}")]
    DecodeError(#[from] prost::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid option {option}: {msg}")]
    InvalidOption {
        option: String,
        msg:    String,
    },

    #[error("Unknown helper \"{0}\"")]
    UnknownHelper(String),

    #[error("File \"{0}\" was requested but is not part of the descriptor set")]
    FileNotFound(String),
}

/// Why a single field could not be mapped to a column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("failed to find ENUM {path}")]
    UnresolvedEnum { path: String },

    #[error("failed to find type")]
    MissingType,
}
