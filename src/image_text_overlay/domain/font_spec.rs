use crate::domain::error::DomainError;
use serde_json::Value;

pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Which font to draw with and at what size.
///
/// `font` is either a bare name looked up in the local font bundle or a URL
/// to download the font file from.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub font: String,
    pub size: f32,
    pub index: u32,
}

impl FontSpec {
    pub fn named(font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            size: DEFAULT_FONT_SIZE,
            index: 0,
        }
    }

    pub fn from_json(value: &Value) -> Result<FontSpec, DomainError> {
        let descriptor = match value {
            Value::String(name) => return Ok(FontSpec::named(name.clone())),
            Value::Object(map) => map,
            other => {
                return Err(DomainError::invalid_field(
                    "font",
                    format!("expected a font name or descriptor object, got {}", other),
                ))
            }
        };

        let font = match descriptor.get("font") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            Some(other) => return Err(DomainError::invalid_field("font.font", format!("expected a non-empty string, got {}", other))),
            None => return Err(DomainError::MissingField("font.font".to_string())),
        };

        let size = match descriptor.get("size") {
            None => DEFAULT_FONT_SIZE,
            Some(v) => v
                .as_f64()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| DomainError::invalid_field("font.size", format!("expected a positive number, got {}", v)))?
                as f32,
        };

        let index = match descriptor.get("index") {
            None => 0,
            Some(v) => v
                .as_u64()
                .and_then(|i| u32::try_from(i).ok())
                .ok_or_else(|| DomainError::invalid_field("font.index", format!("expected a non-negative integer, got {}", v)))?,
        };

        for key in descriptor.keys().filter(|k| !matches!(k.as_str(), "font" | "size" | "index")) {
            tracing::debug!(key = %key, "ignoring unsupported font parameter");
        }

        Ok(FontSpec { font, size, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_with_all_params() {
        let spec = FontSpec::from_json(&json!({"font": "impact", "size": 48, "index": 1})).unwrap();
        assert_eq!(spec, FontSpec { font: "impact".into(), size: 48.0, index: 1 });
    }

    #[test]
    fn test_bare_string_is_shorthand() {
        assert_eq!(FontSpec::from_json(&json!("arial")).unwrap(), FontSpec::named("arial"));
    }

    #[test]
    fn test_descriptor_requires_font_key() {
        let err = FontSpec::from_json(&json!({"size": 12})).unwrap_err();
        assert!(matches!(err, DomainError::MissingField(ref f) if f == "font.font"));
    }

    #[test]
    fn test_rejects_non_positive_size() {
        assert!(FontSpec::from_json(&json!({"font": "arial", "size": 0})).is_err());
        assert!(FontSpec::from_json(&json!({"font": "arial", "size": "big"})).is_err());
    }

    #[test]
    fn test_unknown_params_are_ignored() {
        let spec = FontSpec::from_json(&json!({"font": "arial", "encoding": "unic"})).unwrap();
        assert_eq!(spec, FontSpec::named("arial"));
    }
}
