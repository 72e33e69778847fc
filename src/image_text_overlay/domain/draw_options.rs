use crate::domain::color::Color;
use crate::domain::error::DomainError;
use serde_json::Value;
use std::collections::BTreeMap;

/// A primitive draw-time option value forwarded to the drawing backend as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<OptionValue>),
}

impl OptionValue {
    fn from_json(key: &str, value: &Value) -> Result<OptionValue, DomainError> {
        match value {
            Value::Bool(b) => Ok(OptionValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(OptionValue::Int(i)),
                None => n
                    .as_f64()
                    .map(OptionValue::Float)
                    .ok_or_else(|| DomainError::invalid_field(key, format!("unrepresentable number {}", n))),
            },
            Value::String(s) => Ok(OptionValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| OptionValue::from_json(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(OptionValue::List),
            Value::Null | Value::Object(_) => Err(DomainError::invalid_field(
                key,
                "draw options must be booleans, numbers, strings or lists of those",
            )),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(i) => Some(*i as f64),
            OptionValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            OptionValue::Text(s) => Color::parse_hex(s),
            OptionValue::List(items) => {
                let channels = items
                    .iter()
                    .map(|c| match c {
                        OptionValue::Int(i) => u8::try_from(*i).ok(),
                        _ => None,
                    })
                    .collect::<Option<Vec<u8>>>()?;
                match channels[..] {
                    [r, g, b] => Some(Color::new(r, g, b, 255)),
                    [r, g, b, a] => Some(Color::new(r, g, b, a)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Open-ended map of backend-specific drawing parameters (`stroke_width`, `anchor`, ...).
/// Keys are kept verbatim; interpretation is left to the drawing backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawOptions(BTreeMap<String, OptionValue>);

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_entries<'a>(
        entries: impl IntoIterator<Item = (&'a String, &'a Value)>,
    ) -> Result<DrawOptions, DomainError> {
        let mut options = DrawOptions::new();
        for (key, value) in entries {
            options.insert(key.clone(), OptionValue::from_json(key, value)?);
        }
        Ok(options)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
