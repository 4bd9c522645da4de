use serde::{Deserialize, Serialize};

/// "Grain created" notification from the granulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrainEvent {
    pub duration_ms: f64,
    #[serde(default)]
    pub position: Option<f64>,
}

impl GrainEvent {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            position: None,
        }
    }

    pub fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }
}

/// Reads the leading integer of `text`, ignoring surrounding whitespace and
/// any trailing garbage: `" 42.9ms"` is 42. Returns `None` when no digit
/// follows the optional sign.
pub fn parse_duration_text(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: f64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_prefix() {
        assert_eq!(parse_duration_text("120"), Some(120.0));
        assert_eq!(parse_duration_text("  42.9ms"), Some(42.0));
        assert_eq!(parse_duration_text("+7"), Some(7.0));
        assert_eq!(parse_duration_text("-3"), Some(-3.0));
    }

    #[test]
    fn rejects_text_without_digits() {
        assert_eq!(parse_duration_text(""), None);
        assert_eq!(parse_duration_text("ms"), None);
        assert_eq!(parse_duration_text("-"), None);
        assert_eq!(parse_duration_text(".5"), None);
    }

    #[test]
    fn events_deserialise_without_position() {
        let event: GrainEvent = serde_json::from_str(r#"{ "duration_ms": 55.0 }"#).unwrap();
        assert_eq!(event, GrainEvent::new(55.0));
    }
}
