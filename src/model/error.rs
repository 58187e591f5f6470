// Typed errors for the model core.
//
// Malformed gender strings abort a build — the parse boundary belongs to
// the caller, and silently defaulting a bad record would skew every count
// downstream. Unknown categories are recoverable: the builder logs the row,
// drops it, and counts the drop in the build report.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A gender-code or probability-vector string did not parse.
    MalformedRecord { record: String, detail: String },
    /// A category appeared in a join but was never registered.
    UnknownCategory(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MalformedRecord { record, detail } => {
                write!(f, "Malformed record '{}': {}", record, detail)
            }
            ModelError::UnknownCategory(category) => {
                write!(f, "Unknown category '{}'", category)
            }
        }
    }
}

impl std::error::Error for ModelError {}
