use crate::domain::error::DomainError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    // Integer midpoint, matching `width // 2, height // 2`.
    pub fn center_of(width: u32, height: u32) -> Self {
        Self {
            x: (width / 2) as i32,
            y: (height / 2) as i32,
        }
    }

    pub fn from_json(field: &str, value: &Value) -> Result<Position, DomainError> {
        let coords = value
            .as_array()
            .filter(|items| items.len() == 2)
            .ok_or_else(|| DomainError::invalid_field(field, "expected a 2-element [x, y] array"))?;

        let mut parsed = [0i32; 2];
        for (slot, item) in parsed.iter_mut().zip(coords) {
            let n = item
                .as_f64()
                .ok_or_else(|| DomainError::invalid_field(field, format!("coordinate {} is not a number", item)))?;
            if !n.is_finite() || n.abs() > i32::MAX as f64 {
                return Err(DomainError::invalid_field(field, format!("coordinate {} is out of range", n)));
            }
            *slot = n.round() as i32;
        }
        Ok(Position::new(parsed[0], parsed[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_center_uses_floor_division() {
        assert_eq!(Position::center_of(101, 51), Position::new(50, 25));
        assert_eq!(Position::center_of(1, 1), Position::new(0, 0));
    }

    #[test]
    fn test_from_json_accepts_ints_and_floats() {
        assert_eq!(Position::from_json("xy", &json!([3, -4])).unwrap(), Position::new(3, -4));
        assert_eq!(Position::from_json("xy", &json!([2.6, 7.2])).unwrap(), Position::new(3, 7));
    }

    #[test]
    fn test_from_json_rejects_wrong_arity() {
        assert!(Position::from_json("xy", &json!([1])).is_err());
        assert!(Position::from_json("xy", &json!([1, 2, 3])).is_err());
        assert!(Position::from_json("xy", &json!(["1", 2])).is_err());
    }
}
