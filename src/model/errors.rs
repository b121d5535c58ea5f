//! Error types for editor-model operations.

use thiserror::Error;

use crate::network::NetworkError;
use crate::storage::LayoutError;

/// Errors raised by editing operations.
///
/// Every variant is a recoverable, user-facing condition: a rejected
/// operation reports why and leaves the model exactly as it was. This enum
/// is marked `#[non_exhaustive]` to allow adding new error variants without
/// breaking changes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EditError {
    /// Node identifier is empty or longer than the accepted maximum.
    #[error("node name must consist of between 1 and 10 characters, got {0:?}")]
    InvalidId(String),

    /// A node with this identifier already exists.
    #[error("node \"{0}\" already present")]
    DuplicateId(String),

    /// The identifier does not name a node in the network.
    #[error("\"{0}\" is not in network")]
    UnknownId(String),

    /// An arc was requested from a node to itself.
    #[error("two unique node values required to create an arc, got \"{0}\" twice")]
    SelfLoop(String),

    /// An arc already connects the two nodes, in either direction.
    #[error("arc already present between \"{from}\" and \"{to}\"")]
    DuplicateArc { from: String, to: String },

    /// No arc with this exact orientation exists.
    #[error("no arc exists between nodes \"{from}\" and \"{to}\"")]
    NoSuchArc { from: String, to: String },

    /// A selection-parameterized operation found the wrong number of
    /// selected nodes. The selection is left untouched.
    #[error("must select {expected} node(s), {actual} currently selected")]
    WrongSelectionCount { expected: usize, actual: usize },

    /// A ranged variable was declared with `min > max`.
    #[error("the minimum value {min} must be lower or equal the maximum value {max}")]
    InvalidRange { min: i64, max: i64 },

    /// A committed table does not match the variable's dimensions.
    #[error(
        "table shape mismatch: expected {expected_rows} row(s) of {expected_cols} value(s), \
         got {rows} row(s) of {cols} value(s)"
    )]
    CptShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    /// A table row does not sum to 1 within tolerance.
    #[error("CPT row {row} sums to {sum}, expected 1")]
    RowSumMismatch { row: usize, sum: f64 },

    /// A table entry lies outside the unit interval.
    #[error("CPT entry {value} in row {row} is outside [0, 1]")]
    ProbabilityOutOfRange { row: usize, value: f64 },

    /// The underlying network rejected an arc that would close a cycle.
    #[error("arc \"{from}\" -> \"{to}\" would create a directed cycle")]
    CycleDetected { from: String, to: String },

    /// A network import could not be completed; the caller's previous
    /// state is untouched.
    #[error("import failed: {0}")]
    Import(String),

    /// Layout sidecar I/O or parse failure.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Internal inconsistency (programmer error, not user error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<NetworkError> for EditError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::DuplicateVariable(name) => EditError::DuplicateId(name),
            NetworkError::UnknownVariable(name) => EditError::UnknownId(name),
            NetworkError::SelfLoop(name) => EditError::SelfLoop(name),
            NetworkError::DuplicateArc { from, to } => EditError::DuplicateArc { from, to },
            NetworkError::NoSuchArc { from, to } => EditError::NoSuchArc { from, to },
            NetworkError::CycleDetected { from, to } => EditError::CycleDetected { from, to },
            NetworkError::BadTable(msg) => EditError::Internal(msg),
        }
    }
}
