use crate::infrastructure::error::InfrastructureError;

/// Blocking HTTP GET, used for both the source image and remote fonts.
#[cfg_attr(test, mockall::automock)]
pub trait HttpFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, InfrastructureError>;
}
