//! # Graph editing model
//!
//! This module implements the single source of truth for the editable
//! network: which nodes and arcs exist, and how they are placed and
//! selected on the canvas.
//!
//! ## Key components
//!
//! - **NodeEntry**: a placed node with its position, adjacency lists, and
//!   display state
//! - **ArcRef**: a directed arc as an ordered identifier pair
//! - **EditorModel**: validated node/arc CRUD with cascade removal,
//!   selection-parameterized operations, and synchronous change
//!   notifications
//!
//! ## Design
//!
//! Every mutation validates before touching anything, forwards the change
//! to the network backend, and only then updates the model's own mirrors,
//! so a rejected operation leaves no trace. Nodes live in an
//! insertion-ordered vector with a hash index beside it for O(1) name
//! lookup; the vector order is also the layout-export order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bayedit::{EditorModel, Position, VariableSpec};
//!
//! let mut model = EditorModel::new();
//! model.add_node("Rain", Position { x: 40.0, y: 60.0 }, VariableSpec::labelized())?;
//! model.add_node("WetGrass", Position { x: 40.0, y: 160.0 }, VariableSpec::labelized())?;
//! model.add_arc("Rain", "WetGrass")?;
//! ```

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::model::cpt::{Cpt, VariableSpec};
use crate::model::errors::EditError;
use crate::model::selection::Selection;
use crate::network::{MemoryNetwork, NetworkBackend};
use crate::storage::LayoutEntry;

/// Maximum identifier length accepted by [`EditorModel::add_node`].
const MAX_ID_LEN: usize = 10;

/// A 2D canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// How a node is currently drawn. The states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayState {
    #[default]
    Plain,
    Highlighted,
    Selected,
}

/// A placed node.
///
/// `parents` and `children` hold identifiers, not references, and preserve
/// arc insertion order; the parent order fixes the dimension order of the
/// node's table.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeEntry {
    pub id: String,
    pub position: Position,
    pub parents: SmallVec<[String; 4]>,
    pub children: SmallVec<[String; 4]>,
    pub state: DisplayState,
}

/// A directed arc as an ordered `(from, to)` identifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcRef {
    pub from: String,
    pub to: String,
}

fn validate_id(id: &str) -> Result<(), EditError> {
    let len = id.chars().count();
    if len == 0 || len > MAX_ID_LEN || id.chars().any(char::is_whitespace) {
        return Err(EditError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// The editable network model.
///
/// Owns the node/arc containers exclusively; all mutation goes through the
/// operations below, which validate first, forward accepted changes to the
/// network backend, and raise one change notification per successful
/// mutation. Observers receive notifications synchronously and must not
/// re-enter the model (delivery happens while the model is mutably
/// borrowed).
pub struct EditorModel<N: NetworkBackend = MemoryNetwork> {
    nodes: Vec<NodeEntry>,
    node_index: FxHashMap<String, usize>,
    arcs: Vec<ArcRef>,
    selection: Selection,
    net: N,
    observers: Vec<Box<dyn FnMut()>>,
    revision: u64,
    pending: VecDeque<String>,
}

impl EditorModel<MemoryNetwork> {
    /// Creates an empty model over the bundled in-memory backend.
    pub fn new() -> Self {
        EditorModel::with_backend(MemoryNetwork::new())
    }
}

impl Default for EditorModel<MemoryNetwork> {
    fn default() -> Self {
        EditorModel::new()
    }
}

impl<N: NetworkBackend + fmt::Debug> fmt::Debug for EditorModel<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorModel")
            .field("nodes", &self.nodes)
            .field("arcs", &self.arcs)
            .field("selection", &self.selection)
            .field("net", &self.net)
            .field("revision", &self.revision)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<N: NetworkBackend> EditorModel<N> {
    /// Creates an empty model over the given backend.
    pub fn with_backend(net: N) -> Self {
        EditorModel {
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
            arcs: Vec::new(),
            selection: Selection::new(),
            net,
            observers: Vec::new(),
            revision: 0,
            pending: VecDeque::new(),
        }
    }

    /// Registers a change observer.
    ///
    /// Observers are invoked synchronously after every successful
    /// mutation, once per mutation; a cascade delivers one call per
    /// removed arc plus one for the node itself.
    pub fn subscribe<F: FnMut() + 'static>(&mut self, observer: F) {
        self.observers.push(Box::new(observer));
    }

    /// Monotonic mutation counter; increments once per notification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self) {
        self.revision += 1;
        for observer in self.observers.iter_mut() {
            observer();
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, EditError> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| EditError::UnknownId(id.to_string()))
    }

    // --- accessors -------------------------------------------------------

    pub fn node(&self, id: &str) -> Option<&NodeEntry> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// All nodes in placement order.
    pub fn nodes(&self) -> &[NodeEntry] {
        &self.nodes
    }

    /// All arcs in insertion order.
    pub fn arcs(&self) -> &[ArcRef] {
        &self.arcs
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Currently selected identifiers, in selection order.
    pub fn selection(&self) -> &[String] {
        self.selection.ids()
    }

    /// Shared access to the network backend.
    pub fn network(&self) -> &N {
        &self.net
    }

    /// The node's current table, as stored by the backend.
    pub fn cpt(&self, id: &str) -> Result<&Cpt, EditError> {
        self.index_of(id)?;
        Ok(self.net.cpt(id)?)
    }

    // --- node operations -------------------------------------------------

    /// Adds a node at `position` with the given variable domain.
    ///
    /// The identifier must be 1-10 characters, contain no whitespace (the
    /// layout sidecar is whitespace-delimited), and be unique. The backend
    /// registers the variable with a uniform default table.
    ///
    /// # Returns
    ///
    /// * `Err(InvalidId)` - Malformed identifier
    /// * `Err(DuplicateId)` - Identifier already present
    pub fn add_node(
        &mut self,
        id: &str,
        position: Position,
        spec: VariableSpec,
    ) -> Result<(), EditError> {
        validate_id(id)?;
        if self.node_index.contains_key(id) {
            return Err(EditError::DuplicateId(id.to_string()));
        }
        self.net.add_variable(id, spec)?;
        self.insert_placed_node(id, position);
        Ok(())
    }

    /// Removes a node, cascading over its incident arcs.
    ///
    /// Each incident arc is removed with full [`remove_arc`] semantics and
    /// its own notification, then the variable is erased from the backend
    /// and a final notification is raised for the node. Returns the arcs
    /// that were removed, in arc insertion order.
    ///
    /// [`remove_arc`]: EditorModel::remove_arc
    pub fn remove_node(&mut self, id: &str) -> Result<Vec<ArcRef>, EditError> {
        let idx = self.index_of(id)?;

        let incident: Vec<ArcRef> = self
            .arcs
            .iter()
            .filter(|a| a.from == id || a.to == id)
            .cloned()
            .collect();
        for arc in &incident {
            self.remove_arc(&arc.from, &arc.to)?;
        }

        self.net.erase_variable(id)?;
        self.nodes.remove(idx);
        self.node_index.remove(id);
        for i in idx..self.nodes.len() {
            let name = self.nodes[i].id.clone();
            self.node_index.insert(name, i);
        }
        self.selection.remove(id);

        #[cfg(feature = "tracing")]
        tracing::debug!(node = id, removed_arcs = incident.len(), "node removed");

        self.notify();
        Ok(incident)
    }

    /// Moves a node on the canvas. Layout only: no backend call and no
    /// change notification.
    pub fn set_position(&mut self, id: &str, position: Position) -> Result<(), EditError> {
        let idx = self.index_of(id)?;
        self.nodes[idx].position = position;
        Ok(())
    }

    // --- arc operations --------------------------------------------------

    fn validate_new_arc(&self, from: &str, to: &str) -> Result<(), EditError> {
        self.index_of(from)?;
        self.index_of(to)?;
        if from == to {
            return Err(EditError::SelfLoop(from.to_string()));
        }
        // Both orientations conflict: (a, b) blocks (b, a) as well.
        if self
            .arcs
            .iter()
            .any(|a| (a.from == from && a.to == to) || (a.from == to && a.to == from))
        {
            return Err(EditError::DuplicateArc {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    fn commit_arc(&mut self, from: &str, to: &str) {
        let fi = self.node_index[from];
        let ti = self.node_index[to];
        self.nodes[fi].children.push(to.to_string());
        self.nodes[ti].parents.push(from.to_string());
        self.arcs.push(ArcRef {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Adds a directed arc between two existing, distinct, unconnected
    /// nodes.
    ///
    /// The backend sees the arc before the model commits it, so a backend
    /// rejection (a deeper cycle the pair check cannot see) leaves the
    /// model unchanged.
    ///
    /// # Returns
    ///
    /// * `Err(UnknownId)` - Either endpoint missing
    /// * `Err(SelfLoop)` - `from == to`
    /// * `Err(DuplicateArc)` - The pair is already connected in either
    ///   direction
    /// * `Err(CycleDetected)` - The backend refused the arc
    pub fn add_arc(&mut self, from: &str, to: &str) -> Result<(), EditError> {
        self.validate_new_arc(from, to)?;
        self.net.add_arc(from, to)?;
        self.commit_arc(from, to);
        self.notify();
        Ok(())
    }

    /// Removes the exact directed arc `from -> to`, updating both
    /// endpoints' adjacency lists symmetrically.
    pub fn remove_arc(&mut self, from: &str, to: &str) -> Result<(), EditError> {
        self.index_of(from)?;
        self.index_of(to)?;
        let pos = self
            .arcs
            .iter()
            .position(|a| a.from == from && a.to == to)
            .ok_or_else(|| EditError::NoSuchArc {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        self.net.erase_arc(from, to)?;
        self.arcs.remove(pos);

        let fi = self.node_index[from];
        if let Some(p) = self.nodes[fi].children.iter().position(|c| c.as_str() == to) {
            self.nodes[fi].children.remove(p);
        }
        let ti = self.node_index[to];
        if let Some(p) = self.nodes[ti].parents.iter().position(|c| c.as_str() == from) {
            self.nodes[ti].parents.remove(p);
        }

        self.notify();
        Ok(())
    }

    // --- selection -------------------------------------------------------

    /// Adds a node to the selection. Selecting an already selected node is
    /// a no-op.
    pub fn select(&mut self, id: &str) -> Result<(), EditError> {
        let idx = self.index_of(id)?;
        if self.selection.insert(id) {
            self.nodes[idx].state = DisplayState::Selected;
        }
        Ok(())
    }

    /// Removes a node from the selection.
    pub fn deselect(&mut self, id: &str) -> Result<(), EditError> {
        let idx = self.index_of(id)?;
        if self.selection.remove(id) {
            self.nodes[idx].state = DisplayState::Plain;
        }
        Ok(())
    }

    /// Toggles a node's selection; returns whether it is selected
    /// afterwards.
    pub fn toggle_select(&mut self, id: &str) -> Result<bool, EditError> {
        let idx = self.index_of(id)?;
        let selected = self.selection.toggle(id);
        self.nodes[idx].state = if selected {
            DisplayState::Selected
        } else {
            DisplayState::Plain
        };
        Ok(selected)
    }

    /// Empties the selection and resets display states.
    pub fn clear_selection(&mut self) {
        for id in self.selection.clear() {
            if let Some(&idx) = self.node_index.get(&id) {
                self.nodes[idx].state = DisplayState::Plain;
            }
        }
    }

    /// Adds an arc from the first selected node to the second.
    ///
    /// Requires exactly two selected nodes. The selection is cleared only
    /// when the arc is actually created; on failure it stays for the user
    /// to correct.
    pub fn add_arc_selected(&mut self) -> Result<(), EditError> {
        let pair = self.selection.exactly(2)?.to_vec();
        self.add_arc(&pair[0], &pair[1])?;
        self.clear_selection();
        Ok(())
    }

    /// Removes the arc from the first selected node to the second.
    ///
    /// Requires exactly two selected nodes. The selection is cleared after
    /// the attempt whether or not the arc existed.
    pub fn remove_arc_selected(&mut self) -> Result<(), EditError> {
        let pair = self.selection.exactly(2)?.to_vec();
        let result = self.remove_arc(&pair[0], &pair[1]);
        self.clear_selection();
        result
    }

    /// Returns the table of the single selected node and clears the
    /// selection. Requires exactly one selected node.
    pub fn selected_cpt(&mut self) -> Result<&Cpt, EditError> {
        let id = self.selection.exactly(1)?[0].clone();
        self.clear_selection();
        self.cpt(&id)
    }

    /// Removes every selected node (cascading), returning all removed
    /// arcs.
    pub fn remove_selected_nodes(&mut self) -> Result<Vec<ArcRef>, EditError> {
        let ids = self.selection.ids().to_vec();
        let mut removed = Vec::new();
        for id in ids {
            removed.extend(self.remove_node(&id)?);
        }
        self.clear_selection();
        Ok(removed)
    }

    // --- display state ---------------------------------------------------

    /// Marks a node highlighted unless it is currently selected.
    pub fn highlight(&mut self, id: &str) -> Result<(), EditError> {
        let idx = self.index_of(id)?;
        if self.nodes[idx].state != DisplayState::Selected {
            self.nodes[idx].state = DisplayState::Highlighted;
        }
        Ok(())
    }

    /// Returns every highlighted node to the plain state.
    pub fn clear_highlights(&mut self) {
        for node in &mut self.nodes {
            if node.state == DisplayState::Highlighted {
                node.state = DisplayState::Plain;
            }
        }
    }

    // --- tables ----------------------------------------------------------

    /// Replaces a node's table with user-edited rows.
    ///
    /// Rows are validated against the variable's current dimensions and
    /// the row-sum invariant before anything is stored; a rejected update
    /// retains the previous table unchanged.
    pub fn update_cpt(&mut self, id: &str, rows: Vec<Vec<f64>>) -> Result<(), EditError> {
        self.index_of(id)?;
        let child = self.net.variable(id)?.domain_size();
        let parent_domains = self
            .net
            .parents(id)?
            .iter()
            .map(|p| Ok(self.net.variable(p)?.domain_size()))
            .collect::<Result<Vec<usize>, EditError>>()?;
        let table = Cpt::from_rows(child, parent_domains, rows)?;
        self.net.fill_cpt(id, table)?;
        self.notify();
        Ok(())
    }

    // --- import / export -------------------------------------------------

    /// Rebuilds a model mirror from an already-loaded backend.
    ///
    /// With a layout, every entry places its node at the recorded
    /// position; backend variables missing from the layout are queued for
    /// interactive placement via [`place_pending`]. Without a layout all
    /// variables are queued, in registration order. Arcs are mirrored from
    /// the backend once every node is placed.
    ///
    /// On any failure (a layout entry naming an unknown or duplicate
    /// variable, a malformed identifier, inconsistent backend arcs) no
    /// model is produced, so the caller keeps its previous state.
    ///
    /// [`place_pending`]: EditorModel::place_pending
    pub fn from_network(net: N, layout: Option<&[LayoutEntry]>) -> Result<Self, EditError> {
        let names = net.names();
        for name in &names {
            validate_id(name)
                .map_err(|e| EditError::Import(format!("variable name rejected: {e}")))?;
        }

        let mut model = EditorModel::with_backend(net);
        match layout {
            Some(entries) => {
                let known: FxHashSet<&str> = names.iter().map(String::as_str).collect();
                for entry in entries {
                    if !known.contains(entry.id.as_str()) {
                        return Err(EditError::Import(format!(
                            "layout references unknown variable \"{}\"",
                            entry.id
                        )));
                    }
                    if model.node_index.contains_key(&entry.id) {
                        return Err(EditError::Import(format!(
                            "duplicate layout entry for \"{}\"",
                            entry.id
                        )));
                    }
                    model.insert_placed_node(
                        &entry.id,
                        Position {
                            x: entry.x,
                            y: entry.y,
                        },
                    );
                }
                for name in &names {
                    if !model.node_index.contains_key(name.as_str()) {
                        model.pending.push_back(name.clone());
                    }
                }
            }
            None => model.pending.extend(names),
        }

        if model.pending.is_empty() {
            model.import_arcs()?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = model.nodes.len(),
            pending = model.pending.len(),
            "network imported"
        );

        Ok(model)
    }

    /// The next variable awaiting interactive placement, if any.
    pub fn next_pending(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Places the next queued variable at `position`.
    ///
    /// When the queue drains, the backend's arcs are mirrored into the
    /// model. Returns the name now at the front of the queue, or `None`
    /// when placement is complete.
    pub fn place_pending(&mut self, position: Position) -> Result<Option<String>, EditError> {
        let id = self
            .pending
            .pop_front()
            .ok_or_else(|| EditError::Import("no pending placements".to_string()))?;
        self.insert_placed_node(&id, position);
        if self.pending.is_empty() {
            self.import_arcs()?;
        }
        Ok(self.pending.front().cloned())
    }

    /// Snapshot of node positions for the layout sidecar, in placement
    /// order.
    pub fn export_layout(&self) -> Vec<LayoutEntry> {
        self.nodes
            .iter()
            .map(|n| LayoutEntry {
                id: n.id.clone(),
                x: n.position.x,
                y: n.position.y,
            })
            .collect()
    }

    /// Inserts a node entry that already exists as a backend variable.
    fn insert_placed_node(&mut self, id: &str, position: Position) {
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.to_string(),
            position,
            parents: SmallVec::new(),
            children: SmallVec::new(),
            state: DisplayState::Plain,
        });
        self.node_index.insert(id.to_string(), idx);
        self.notify();
    }

    /// Mirrors the backend's arcs into the model after an import.
    fn import_arcs(&mut self) -> Result<(), EditError> {
        for (from, to) in self.net.arcs() {
            self.validate_new_arc(&from, &to).map_err(|e| {
                EditError::Import(format!("network arc \"{from}\" -> \"{to}\": {e}"))
            })?;
            self.commit_arc(&from, &to);
            self.notify();
        }
        Ok(())
    }
}
