use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Image processing failed: {0}")]
    ImageProcessingError(String),

    #[error("File storage error: {0}")]
    FileStorageError(String),

    #[error("External API call failed: {0}")]
    ExternalApiError(String),

    #[error("Data decoding failed: {0}")]
    DecodingError(String),

    #[error("Font '{font}' could not be resolved: local lookup failed ({local}); remote fetch failed ({remote})")]
    FontResolutionError {
        font: String,
        #[source]
        local: LocalFontError,
        remote: String,
    },

    #[error("Object storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Underlying image library error")]
    ImageLibError(#[from] image::ImageError),

    #[error("Underlying I/O error")]
    IoError(#[from] std::io::Error),

    #[error("Reqwest error")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Base64 decode error")]
    Base64DecodeError(#[from] base64::DecodeError),
}

/// Why a font could not be taken from the local bundle.
#[derive(Error, Debug)]
pub enum LocalFontError {
    #[error("font file {0} not found")]
    NotFound(PathBuf),

    #[error("font file {path} could not be read")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {0} is not a usable font")]
    Malformed(PathBuf),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("local file {0} was not found")]
    FileNotFound(PathBuf),

    #[error("upload of '{key}' failed: {reason}")]
    Upload { key: String, reason: String },

    #[error("presigning '{key}' failed: {reason}")]
    Presign { key: String, reason: String },
}
