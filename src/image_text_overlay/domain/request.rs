use serde::Deserialize;
use serde_json::{Map, Value};

pub type RawAnnotation = Map<String, Value>;

/// How the edited image is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Base64,
    S3,
    Unsupported(String),
}

impl ReturnType {
    pub fn parse(value: Option<&str>) -> ReturnType {
        match value {
            None | Some("base64") => ReturnType::Base64,
            Some("s3") => ReturnType::S3,
            Some(other) => ReturnType::Unsupported(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayRequest {
    pub image_url: String,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub texts: Vec<RawAnnotation>,
}

impl OverlayRequest {
    pub fn return_type(&self) -> ReturnType {
        ReturnType::parse(self.return_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_when_optional_fields_absent() {
        let request: OverlayRequest = serde_json::from_value(json!({"image_url": "https://x/y.png"})).unwrap();
        assert_eq!(request.return_type(), ReturnType::Base64);
        assert!(request.texts.is_empty());
    }

    #[test]
    fn test_image_url_is_required() {
        let result: Result<OverlayRequest, _> = serde_json::from_value(json!({"texts": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_return_type_parsing() {
        assert_eq!(ReturnType::parse(Some("s3")), ReturnType::S3);
        assert_eq!(ReturnType::parse(Some("base64")), ReturnType::Base64);
        assert_eq!(ReturnType::parse(Some("gcs")), ReturnType::Unsupported("gcs".into()));
    }
}
