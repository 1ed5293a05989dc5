//! Errors in serializing values through a template
use std::{error::Error, fmt::Display};

use serde::ser;

use crate::gg_error::GError;

/// A type alias for `Result` with [`SError`] as the error type.
pub type SResult<T> = Result<T, SError>;

/// Errors that can occur while serializing a value through a template
#[derive(Debug)]
pub enum SError {
    /// Indicates that the template ran out of placeholders before every
    /// leaf of the value was serialized.
    TemplateTooShort,
    /// Indicates that the value was exhausted while the template still had
    /// placeholders to fill.
    UnfilledPlaceholders(usize),
    /// Indicates a value a positional template cannot express, such as a
    /// map or a `None`.
    Unrepresentable(&'static str),
    /// Indicates a malformed template
    TemplateError(GError),
    /// Indicates a failure during serialization
    SerializationFailure(String),
}

impl Display for SError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateTooShort => write!(f, "The template ran out of placeholders before the value was fully serialized"),
            Self::UnfilledPlaceholders(n) => write!(f, "The value was exhausted with {n} placeholder(s) left unfilled"),
            Self::Unrepresentable(what) => write!(f, "Cannot serialize a {what} through a positional template"),
            Self::TemplateError(e) => write!(f, "Error parsing template: {e}"),
            Self::SerializationFailure(msg) => write!(f, "Error serializing data: {msg}"),
        }
    }
}

impl Error for SError {}

impl ser::Error for SError {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Self::SerializationFailure(msg.to_string())
    }
}

impl From<GError> for SError {
    fn from(value: GError) -> Self {
        Self::TemplateError(value)
    }
}
