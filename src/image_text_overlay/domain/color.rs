use crate::domain::error::DomainError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Accepts `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn parse_hex(hex_str: &str) -> Option<Color> {
        let hex = hex_str.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            6 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Coerces a JSON fill value into a color. `field` is only used for error messages.
    pub fn from_json(field: &str, value: &Value) -> Result<Color, DomainError> {
        match value {
            Value::String(s) => Color::parse_hex(s).ok_or_else(|| {
                DomainError::invalid_field(field, format!("'{}' is not a #RRGGBB or #RRGGBBAA color", s))
            }),
            Value::Array(items) => {
                let mut channels = Vec::with_capacity(items.len());
                for item in items {
                    let channel = item
                        .as_u64()
                        .filter(|c| *c <= 255)
                        .ok_or_else(|| DomainError::invalid_field(field, format!("channel {} is not an integer in 0..=255", item)))?;
                    channels.push(channel as u8);
                }
                match channels[..] {
                    [r, g, b] => Ok(Color::new(r, g, b, 255)),
                    [r, g, b, a] => Ok(Color::new(r, g, b, a)),
                    _ => Err(DomainError::invalid_field(
                        field,
                        format!("expected 3 or 4 channels, got {}", channels.len()),
                    )),
                }
            }
            other => Err(DomainError::invalid_field(field, format!("unsupported color value {}", other))),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}
