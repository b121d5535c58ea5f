//! The graph editing model.
//!
//! This module provides:
//! - **errors**: Recoverable error types for rejected operations
//! - **graph**: The editor model with validated node/arc CRUD,
//!   selection-parameterized operations, and change notifications
//! - **selection**: The ordered selection set
//! - **cpt**: Variable domains, conditional probability tables, and the
//!   parent-configuration row ordering

pub mod cpt;
pub mod errors;
pub mod graph;
pub mod selection;

pub use cpt::{parent_configurations, Cpt, VariableSpec};
pub use errors::EditError;
pub use graph::{ArcRef, DisplayState, EditorModel, NodeEntry, Position};
pub use selection::Selection;
