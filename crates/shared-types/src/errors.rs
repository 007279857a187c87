//! # Error Types
//!
//! Errors shared by the binary codec and configuration parsing.

use thiserror::Error;

/// Errors raised while reading a binary layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes remain than the field requires.
    #[error("Buffer underflow: needed {needed} bytes at offset {offset}, {available} available")]
    BufferUnderflow {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A length or count field does not fit the platform size type.
    #[error("Length overflow at offset {offset}")]
    LengthOverflow { offset: usize },

    /// An enumerated field holds a value outside its range.
    #[error("Invalid {field} value {value}")]
    InvalidValue { field: &'static str, value: u64 },
}

/// Errors raised while parsing a configuration bag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Section is absent from the bag.
    #[error("Missing configuration section: [{section}]")]
    MissingSection { section: String },

    /// Required property is absent from its section.
    #[error("Missing configuration property: [{section}] {key}")]
    MissingProperty { section: String, key: String },

    /// Property is present but its value cannot be parsed.
    #[error("Malformed configuration property: [{section}] {key} = '{value}'")]
    MalformedProperty {
        section: String,
        key: String,
        value: String,
    },

    /// Section contains keys nobody consumed.
    #[error("Unknown configuration properties in [{section}]: {keys:?}")]
    UnknownProperties { section: String, keys: Vec<String> },
}
