//! Errors in template strings or argument lists
use std::fmt::Display;
use pest::RuleType;

/// Type alias for a `Result` with [`GError`] as the error type.
pub type GResult<T> = Result<T, GError>;

/// An error raised while parsing or rendering a template
#[derive(Debug)]
pub enum GError {
    /// Indicates a malformed template: an unmatched brace, an unrecognized
    /// character inside a placeholder, or a width/precision out of range.
    BadTemplate { s: String, reason: String },

    /// Indicates that the template has more placeholders than arguments
    /// were supplied for it.
    TooFewArguments { nargs: usize, nplaceholders: usize },

    /// Indicates an error writing rendered text to an output stream.
    Io(std::io::Error),
}

impl Display for GError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GError::BadTemplate { s, reason } => {
                write!(f, "Could not parse '{s}' as a format template: {reason}")
            }
            GError::TooFewArguments { nargs, nplaceholders } => {
                write!(f, "The template has {nplaceholders} placeholders, but only {nargs} arguments were supplied")
            }
            GError::Io(e) => {
                write!(f, "Error writing formatted output: {e}")
            }
        }
    }
}

impl std::error::Error for GError {}

impl GError {
    pub fn from_pest<R: RuleType>(e: pest::error::Error<R>, s: String) -> Self {
        Self::BadTemplate { s, reason: e.to_string() }
    }
}

impl From<std::io::Error> for GError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
