//! # Bayedit - Bayesian network graph editing model
//!
//! Bayedit is the in-memory editing model behind a Bayesian-network canvas
//! editor: it owns the mapping between user-facing node/arc identifiers
//! and the underlying network structure, validates every structural change
//! before committing it, keeps a positional layout for rendering, and
//! raises change notifications for a presentation layer to consume.
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - **model**: The editor model: node/arc CRUD, selection, tables
//! - **network**: Backend seam for the probabilistic-network library,
//!   with a bundled in-memory implementation
//! - **storage**: The plain-text positional layout sidecar
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bayedit::{EditorModel, Position, VariableSpec};
//!
//! let mut model = EditorModel::new();
//! model.add_node("Rain", Position { x: 40.0, y: 60.0 }, VariableSpec::labelized())?;
//! model.add_node("Sprinkler", Position { x: 200.0, y: 60.0 }, VariableSpec::labelized())?;
//! model.add_node("WetGrass", Position { x: 120.0, y: 180.0 }, VariableSpec::labelized())?;
//! model.add_arc("Rain", "WetGrass")?;
//! model.add_arc("Sprinkler", "WetGrass")?;
//! model.update_cpt("Rain", vec![vec![0.8, 0.2]])?;
//! ```

#![forbid(unsafe_code)]

pub mod model;
pub mod network;
pub mod storage;

// Re-export commonly used types
pub use model::cpt::{parent_configurations, Cpt, VariableSpec};
pub use model::errors::EditError;
pub use model::graph::{ArcRef, DisplayState, EditorModel, NodeEntry, Position};
pub use model::selection::Selection;
pub use network::{MemoryNetwork, NetworkBackend, NetworkError};
pub use storage::{LayoutEntry, LayoutError};
