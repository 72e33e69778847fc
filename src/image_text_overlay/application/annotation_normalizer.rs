use crate::domain::color::Color;
use crate::domain::draw_options::DrawOptions;
use crate::domain::error::DomainError;
use crate::domain::font_spec::FontSpec;
use crate::domain::position::Position;
use crate::domain::request::RawAnnotation;
use crate::domain::text_overlay::TextOverlay;
use serde_json::Value;

/// Turns a raw annotation mapping into a `TextOverlay`, filling in defaults.
///
/// `text`, `font`, `fill` and `xy` are consumed; every other key is kept as a draw option.
pub struct AnnotationNormalizer {
    default_font: FontSpec,
}

impl AnnotationNormalizer {
    pub fn new(default_font: impl Into<String>) -> Self {
        Self {
            default_font: FontSpec::named(default_font),
        }
    }

    pub fn normalize(&self, mut raw: RawAnnotation, canvas_size: (u32, u32)) -> Result<TextOverlay, DomainError> {
        let text = match raw.remove("text") {
            Some(Value::String(text)) => text,
            Some(other) => return Err(DomainError::invalid_field("text", format!("expected a string, got {}", other))),
            None => return Err(DomainError::MissingField("text".to_string())),
        };

        let font = match raw.remove("font") {
            Some(value) => FontSpec::from_json(&value)?,
            None => self.default_font.clone(),
        };

        let fill = match raw.remove("fill") {
            Some(value) => Color::from_json("fill", &value)?,
            None => Color::default(),
        };

        // Default is the centre of the canvas as it is right now.
        let position = match raw.remove("xy") {
            Some(value) => Position::from_json("xy", &value)?,
            None => Position::center_of(canvas_size.0, canvas_size.1),
        };

        let options = DrawOptions::from_json_entries(&raw)?;

        Ok(TextOverlay::new(text, font, fill, position).with_options(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draw_options::OptionValue;
    use serde_json::json;

    fn raw(value: Value) -> RawAnnotation {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults_are_applied() {
        let normalizer = AnnotationNormalizer::new("arial");
        let overlay = normalizer.normalize(raw(json!({"text": "hi"})), (101, 60)).unwrap();

        assert_eq!(overlay.text, "hi");
        assert_eq!(overlay.font, FontSpec::named("arial"));
        assert_eq!(overlay.fill, Color::new(255, 0, 0, 255));
        assert_eq!(overlay.position, Position::new(50, 30));
        assert!(overlay.options.is_empty());
    }

    #[test]
    fn test_default_position_follows_canvas_size() {
        let normalizer = AnnotationNormalizer::new("arial");
        let small = normalizer.normalize(raw(json!({"text": "a"})), (10, 10)).unwrap();
        let large = normalizer.normalize(raw(json!({"text": "a"})), (1000, 401)).unwrap();

        assert_eq!(small.position, Position::new(5, 5));
        assert_eq!(large.position, Position::new(500, 200));
    }

    #[test]
    fn test_explicit_values_win() {
        let normalizer = AnnotationNormalizer::new("arial");
        let overlay = normalizer
            .normalize(
                raw(json!({
                    "text": "caption",
                    "font": {"font": "https://example.com/impact.ttf", "size": 64},
                    "fill": [0, 255, 0],
                    "xy": [12, 34]
                })),
                (200, 200),
            )
            .unwrap();

        assert_eq!(overlay.font.font, "https://example.com/impact.ttf");
        assert_eq!(overlay.font.size, 64.0);
        assert_eq!(overlay.fill, Color::new(0, 255, 0, 255));
        assert_eq!(overlay.position, Position::new(12, 34));
    }

    #[test]
    fn test_remaining_keys_become_draw_options() {
        let normalizer = AnnotationNormalizer::new("arial");
        let overlay = normalizer
            .normalize(raw(json!({"text": "a", "stroke_width": 3, "anchor": "mm"})), (10, 10))
            .unwrap();

        assert_eq!(overlay.options.len(), 2);
        assert_eq!(overlay.options.get("stroke_width"), Some(&OptionValue::Int(3)));
        assert_eq!(overlay.options.get("anchor"), Some(&OptionValue::Text("mm".into())));
        assert!(overlay.options.get("text").is_none());
    }

    #[test]
    fn test_missing_text_is_an_error() {
        let normalizer = AnnotationNormalizer::new("arial");
        let err = normalizer.normalize(raw(json!({"xy": [1, 2]})), (10, 10)).unwrap_err();
        assert!(matches!(err, DomainError::MissingField(ref field) if field == "text"));
    }

    #[test]
    fn test_non_string_text_is_an_error() {
        let normalizer = AnnotationNormalizer::new("arial");
        assert!(normalizer.normalize(raw(json!({"text": 42})), (10, 10)).is_err());
    }
}
