//! Error types for the crack-field pipeline.

use thiserror::Error;

/// Result type alias using [`KfieldError`].
pub type Result<T> = std::result::Result<T, KfieldError>;

#[derive(Debug, Error)]
pub enum KfieldError {
    /// Requested crack system does not exist in the coefficient file.
    #[error("system index {index} out of range (1..={count})")]
    SystemIndexOutOfRange { index: usize, count: usize },

    /// A named coefficient is absent from its text block.
    #[error("coefficient {name} not found in system {index}")]
    MissingCoefficient { name: String, index: usize },

    /// A coefficient line exists but its value does not parse.
    #[error("malformed value for {name} in system {index}")]
    MalformedCoefficient { name: String, index: usize },

    /// The crack-system table lacks a required column.
    #[error("column {0:?} missing from crack-system table")]
    MissingColumn(String),

    /// A crack-system table record could not be parsed.
    #[error("malformed record in crack-system table: {0}")]
    MalformedRecord(String),

    /// The rotated stiffness matrix could not be inverted.
    #[error("rotated stiffness matrix is singular")]
    SingularStiffness,

    /// The characteristic quartic did not yield the two upper-half-plane
    /// roots the anisotropic crack solution requires.
    #[error("characteristic equation has {found} roots with positive imaginary part, expected 2")]
    DegenerateRoots { found: usize },

    /// Two configurations meant to describe the same atom set disagree.
    #[error("atom counts differ between configurations: {expected} vs {found}")]
    AtomCountMismatch { expected: usize, found: usize },

    /// A configuration file violates the expected record layout.
    #[error("malformed configuration file: {0}")]
    MalformedConfiguration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table error: {0}")]
    Csv(#[from] csv::Error),
}
