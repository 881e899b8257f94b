//! Coerced feature values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys whose values are coerced to numbers
///
/// Only these keys are numeric. Everything else goes through boolean
/// coercion, so `"0"`/`"1"` mean `false`/`true` only where a number is not
/// expected.
pub const NUMERIC_KEYS: [&str; 9] = [
    "x",
    "y",
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "opacity",
];

/// A feature value after type coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric value (geometry keys only)
    Number(f64),
    /// Boolean value
    Bool(bool),
    /// Anything that could not be coerced
    Text(String),
}

impl FeatureValue {
    /// Coerce a raw value for `key`
    ///
    /// `raw` is `None` for a bare key with no `=value`.
    pub fn coerce(key: &str, raw: Option<&str>) -> Self {
        if is_numeric_key(key) {
            return raw
                .and_then(parse_number)
                .map_or_else(|| Self::Text(raw.unwrap_or_default().to_string()), Self::Number);
        }

        match raw {
            None | Some("true" | "1" | "yes") => Self::Bool(true),
            Some("false" | "0" | "no") => Self::Bool(false),
            Some(other) => Self::Text(other.to_string()),
        }
    }

    /// Boolean payload, if this is a boolean
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric payload; text that spells a finite number also counts
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_number(text),
            Self::Bool(_) => None,
        }
    }

    /// Text payload, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Whether `key` is one of the numeric geometry keys
pub fn is_numeric_key(key: &str) -> bool {
    NUMERIC_KEYS.contains(&key)
}

// Rust's float parser also accepts "inf" and "NaN"; those are not numbers here.
fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_numeric_key_coerces_to_number() {
        for key in NUMERIC_KEYS {
            assert_eq!(FeatureValue::coerce(key, Some("42")), FeatureValue::Number(42.0), "{key}");
        }
        assert_eq!(FeatureValue::coerce("opacity", Some("0.5")), FeatureValue::Number(0.5));
    }

    #[test]
    fn test_numeric_key_with_garbage_stays_text() {
        assert_eq!(FeatureValue::coerce("width", Some("abc")), FeatureValue::Text("abc".into()));
        assert_eq!(FeatureValue::coerce("width", Some("inf")), FeatureValue::Text("inf".into()));
        assert_eq!(FeatureValue::coerce("width", Some("NaN")), FeatureValue::Text("NaN".into()));
        assert_eq!(FeatureValue::coerce("width", None), FeatureValue::Text(String::new()));
    }

    #[test]
    fn test_numeric_keys_never_become_booleans() {
        assert_eq!(FeatureValue::coerce("x", Some("1")), FeatureValue::Number(1.0));
        assert_eq!(FeatureValue::coerce("x", Some("yes")), FeatureValue::Text("yes".into()));
    }

    #[test]
    fn test_boolean_coercion() {
        for raw in ["true", "1", "yes"] {
            assert_eq!(FeatureValue::coerce("foo", Some(raw)), FeatureValue::Bool(true), "{raw}");
        }
        assert_eq!(FeatureValue::coerce("foo", None), FeatureValue::Bool(true));
        for raw in ["false", "0", "no"] {
            assert_eq!(FeatureValue::coerce("foo", Some(raw)), FeatureValue::Bool(false), "{raw}");
        }
        assert_eq!(FeatureValue::coerce("foo", Some("bar")), FeatureValue::Text("bar".into()));
    }

    #[test]
    fn test_boolean_coercion_is_case_sensitive() {
        assert_eq!(FeatureValue::coerce("foo", Some("YES")), FeatureValue::Text("YES".into()));
    }

    #[test]
    fn test_as_number_reads_numeric_text() {
        assert_eq!(FeatureValue::Text("12".into()).as_number(), Some(12.0));
        assert_eq!(FeatureValue::Bool(true).as_number(), None);
    }
}
