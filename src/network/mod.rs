//! Seam to the underlying probabilistic-network library.
//!
//! The editing model forwards every accepted structural change here and
//! treats the backend as authoritative for full network validity, in
//! particular acyclicity. [`MemoryNetwork`] is a bundled implementation so
//! the model is usable and testable without an external library; a real
//! inference library is wired in by implementing [`NetworkBackend`].

pub mod memory;

pub use memory::MemoryNetwork;

use thiserror::Error;

use crate::model::cpt::{Cpt, VariableSpec};

/// Errors reported by a network backend.
///
/// Marked `#[non_exhaustive]`: adapters for external libraries may need
/// further variants.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("variable \"{0}\" already present")]
    DuplicateVariable(String),

    #[error("variable \"{0}\" is not in network")]
    UnknownVariable(String),

    #[error("variable \"{0}\" cannot be its own parent")]
    SelfLoop(String),

    #[error("arc \"{from}\" -> \"{to}\" already present")]
    DuplicateArc { from: String, to: String },

    #[error("no arc \"{from}\" -> \"{to}\" in network")]
    NoSuchArc { from: String, to: String },

    #[error("arc \"{from}\" -> \"{to}\" would create a directed cycle")]
    CycleDetected { from: String, to: String },

    #[error("{0}")]
    BadTable(String),
}

/// Storage of variables, arcs, and tables for a directed acyclic network.
///
/// Arc order is observable: `parents` lists a variable's parents in arc
/// insertion order, and that order fixes the dimension order of the
/// variable's table.
pub trait NetworkBackend {
    /// Registers a variable and its default uniform table.
    fn add_variable(&mut self, name: &str, spec: VariableSpec) -> Result<(), NetworkError>;

    /// Erases a variable, its incident arcs, and its table. Children's
    /// tables are resized for the lost parent.
    fn erase_variable(&mut self, name: &str) -> Result<(), NetworkError>;

    /// Adds a directed arc. Rejects unknown endpoints, self-loops,
    /// duplicates of the same orientation, and arcs closing a cycle.
    fn add_arc(&mut self, from: &str, to: &str) -> Result<(), NetworkError>;

    /// Erases the exact directed arc `from -> to`.
    fn erase_arc(&mut self, from: &str, to: &str) -> Result<(), NetworkError>;

    /// Replaces a variable's table. The table's dimensions must match the
    /// variable's domain and current parent set.
    fn fill_cpt(&mut self, name: &str, table: Cpt) -> Result<(), NetworkError>;

    /// The variable's current table.
    fn cpt(&self, name: &str) -> Result<&Cpt, NetworkError>;

    /// The variable's domain.
    fn variable(&self, name: &str) -> Result<&VariableSpec, NetworkError>;

    /// Parents of a variable, in arc insertion order.
    fn parents(&self, name: &str) -> Result<Vec<String>, NetworkError>;

    /// All variable names, in registration order.
    fn names(&self) -> Vec<String>;

    /// All arcs as `(from, to)` pairs, in insertion order.
    fn arcs(&self) -> Vec<(String, String)>;
}
