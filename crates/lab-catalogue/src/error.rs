//! Error types for catalogue parsing and validation.

use thiserror::Error;

/// Errors raised while parsing or validating a catalogue document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueError {
    /// The document is not valid JSON or misses required fields.
    #[error("invalid catalogue JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The document version is not supported.
    #[error("unsupported catalogue version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Supported version number.
        expected: u32,
        /// Version found in the document.
        actual: u32,
    },

    /// The document lists no labs.
    #[error("catalogue contains no labs")]
    EmptyCatalogue,

    /// A lab name is blank.
    #[error("lab at index {index} has a blank name")]
    BlankName {
        /// Index of the offending lab.
        index: usize,
    },

    /// Two labs share a name.
    #[error("lab name '{name}' appears more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A capacity is present but not positive.
    #[error("lab '{name}' has capacity {capacity}; capacity must be positive")]
    NonPositiveCapacity {
        /// Name of the offending lab.
        name: String,
        /// The rejected capacity.
        capacity: i64,
    },
}
