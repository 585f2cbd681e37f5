//! Error types for SweetBite

use thiserror::Error;

/// The main error type for SweetBite operations
///
/// The simulation itself never fails; these cover loading and validating
/// configuration and the I/O done by hosts around it.
#[derive(Debug, Error)]
pub enum ToppingError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Range error: {field} has min {min} greater than max {max}")]
    InvertedRange { field: String, min: f32, max: f32 },

    #[error("Value out of range: {field} must be finite and non-negative, got {value}")]
    ValueOutOfRange { field: String, value: f32 },

    #[error("Unknown mode: {0} (expected \"sprinkle\" or \"place\")")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for SweetBite operations
pub type Result<T> = std::result::Result<T, ToppingError>;

impl From<toml::de::Error> for ToppingError {
    fn from(err: toml::de::Error) -> Self {
        ToppingError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ToppingError {
    fn from(err: toml::ser::Error) -> Self {
        ToppingError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_message_names_field() {
        let err = ToppingError::InvertedRange {
            field: "scale_range".into(),
            min: 1.2,
            max: 0.8,
        };
        let msg = err.to_string();
        assert!(msg.contains("scale_range"));
        assert!(msg.contains("1.2"));
    }

    #[test]
    fn toml_error_converts() {
        let parsed: std::result::Result<toml::value::Table, _> = toml::from_str("capacity = ");
        let err: ToppingError = parsed.unwrap_err().into();
        assert!(matches!(err, ToppingError::TomlParseError(_)));
    }
}
