use thiserror::Error;
use crate::infrastructure::error::InfrastructureError;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Cannot derive an image name from '{url}': {reason}")]
    InvalidImageUrl { url: String, reason: String },

    #[error("Infrastructure error occurred: {0}")]
    InfrastructureError(#[from] InfrastructureError),
}
