use super::error::InfrastructureError;
use crate::domain::http_fetcher_trait::HttpFetcher;
use reqwest::header::USER_AGENT;

// Some origins reject requests with an empty or library-default agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

pub struct DefaultExternalImageFetcher {
    user_agent: String,
}

impl DefaultExternalImageFetcher {
    pub fn new() -> Self {
        Self::with_user_agent(BROWSER_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    fn decode_data_url(url: &str) -> Result<Vec<u8>, InfrastructureError> {
        let base64_data = url
            .split(',')
            .nth(1)
            .ok_or_else(|| InfrastructureError::DecodingError("Invalid data URL: missing comma".to_string()))?;
        Ok(base64::decode(base64_data)?)
    }
}

impl Default for DefaultExternalImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher for DefaultExternalImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, InfrastructureError> {
        if url.starts_with("data:") {
            return Self::decode_data_url(url);
        }

        // No timeout: the invocation environment bounds the request as a whole.
        let client = reqwest::blocking::Client::builder().timeout(None).build()?;
        let response = client.get(url).header(USER_AGENT, &self.user_agent).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(InfrastructureError::ExternalApiError(format!("GET {} returned {}", url, status)));
        }
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_decodes_data_url_without_network() {
        let fetcher = DefaultExternalImageFetcher::new();
        let bytes = fetcher.fetch("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_fetch_rejects_data_url_without_payload() {
        let fetcher = DefaultExternalImageFetcher::new();
        let err = fetcher.fetch("data:image/png;base64").unwrap_err();
        assert!(matches!(err, InfrastructureError::DecodingError(_)));
    }

    #[test]
    fn test_fetch_rejects_bad_base64() {
        let fetcher = DefaultExternalImageFetcher::new();
        let err = fetcher.fetch("data:image/png;base64,!!!").unwrap_err();
        assert!(matches!(err, InfrastructureError::Base64DecodeError(_)));
    }
}
