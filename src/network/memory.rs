//! Bundled in-memory network backend.
//!
//! Holds variables, arcs, and tables with the same observable behavior an
//! external inference library provides at its structural surface: unique
//! variable names, no self-loops or duplicate arcs, cycle rejection, and
//! tables that always match the current structure. Whenever an operation
//! changes the shape of a variable's parent set, that variable's table is
//! reset to uniform at the new dimensions.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::cpt::{Cpt, VariableSpec};
use crate::network::{NetworkBackend, NetworkError};

/// A registered variable.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct VariableEntry {
    name: String,
    spec: VariableSpec,
}

/// In-memory directed acyclic network with per-variable tables.
///
/// Variables and arcs live in insertion-ordered vectors with a hash index
/// beside them for O(1) name lookup; iteration order is deterministic.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryNetwork {
    variables: Vec<VariableEntry>,
    var_index: FxHashMap<String, usize>,
    arcs: Vec<(String, String)>,
    cpts: FxHashMap<String, Cpt>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        MemoryNetwork::default()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    fn index_of(&self, name: &str) -> Result<usize, NetworkError> {
        self.var_index
            .get(name)
            .copied()
            .ok_or_else(|| NetworkError::UnknownVariable(name.to_string()))
    }

    /// True when `goal` is reachable from `start` along directed arcs.
    fn reaches(&self, start: &str, goal: &str) -> bool {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == goal {
                return true;
            }
            for (from, to) in &self.arcs {
                if from == current && seen.insert(to) {
                    stack.push(to);
                }
            }
        }
        false
    }

    fn parent_domain_sizes(&self, name: &str) -> Vec<usize> {
        self.arcs
            .iter()
            .filter(|(_, to)| to == name)
            .map(|(from, _)| {
                let idx = self.var_index[from.as_str()];
                self.variables[idx].spec.domain_size()
            })
            .collect()
    }

    /// Resets a variable's table to uniform at its current dimensions.
    fn reset_cpt(&mut self, name: &str) {
        let idx = self.var_index[name];
        let child = self.variables[idx].spec.domain_size();
        let parents = self.parent_domain_sizes(name);
        self.cpts.insert(name.to_string(), Cpt::uniform(child, parents));
    }

    fn rebuild_var_index(&mut self) {
        self.var_index = self
            .variables
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), i))
            .collect();
    }
}

impl NetworkBackend for MemoryNetwork {
    fn add_variable(&mut self, name: &str, spec: VariableSpec) -> Result<(), NetworkError> {
        if self.var_index.contains_key(name) {
            return Err(NetworkError::DuplicateVariable(name.to_string()));
        }
        let idx = self.variables.len();
        self.variables.push(VariableEntry {
            name: name.to_string(),
            spec,
        });
        self.var_index.insert(name.to_string(), idx);
        self.reset_cpt(name);
        Ok(())
    }

    fn erase_variable(&mut self, name: &str) -> Result<(), NetworkError> {
        let idx = self.index_of(name)?;

        // Children whose parent set shrinks need their tables resized.
        let children: Vec<String> = self
            .arcs
            .iter()
            .filter(|(from, _)| from == name)
            .map(|(_, to)| to.clone())
            .collect();

        self.arcs.retain(|(from, to)| from != name && to != name);
        self.variables.remove(idx);
        self.rebuild_var_index();
        self.cpts.remove(name);

        for child in children {
            self.reset_cpt(&child);
        }
        Ok(())
    }

    fn add_arc(&mut self, from: &str, to: &str) -> Result<(), NetworkError> {
        self.index_of(from)?;
        self.index_of(to)?;
        if from == to {
            return Err(NetworkError::SelfLoop(from.to_string()));
        }
        if self.arcs.iter().any(|(f, t)| f == from && t == to) {
            return Err(NetworkError::DuplicateArc {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if self.reaches(to, from) {
            return Err(NetworkError::CycleDetected {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.arcs.push((from.to_string(), to.to_string()));
        self.reset_cpt(to);
        Ok(())
    }

    fn erase_arc(&mut self, from: &str, to: &str) -> Result<(), NetworkError> {
        self.index_of(from)?;
        self.index_of(to)?;
        let pos = self
            .arcs
            .iter()
            .position(|(f, t)| f == from && t == to)
            .ok_or_else(|| NetworkError::NoSuchArc {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        // Order-preserving removal: arc order is parent order for tables.
        self.arcs.remove(pos);
        self.reset_cpt(to);
        Ok(())
    }

    fn fill_cpt(&mut self, name: &str, table: Cpt) -> Result<(), NetworkError> {
        let idx = self.index_of(name)?;
        let child = self.variables[idx].spec.domain_size();
        let parents = self.parent_domain_sizes(name);
        if table.child_domain() != child || table.parent_domains() != parents.as_slice() {
            return Err(NetworkError::BadTable(format!(
                "table dimensions do not match variable \"{}\" and its parents",
                name
            )));
        }
        self.cpts.insert(name.to_string(), table);
        Ok(())
    }

    fn cpt(&self, name: &str) -> Result<&Cpt, NetworkError> {
        self.index_of(name)?;
        self.cpts
            .get(name)
            .ok_or_else(|| NetworkError::UnknownVariable(name.to_string()))
    }

    fn variable(&self, name: &str) -> Result<&VariableSpec, NetworkError> {
        let idx = self.index_of(name)?;
        Ok(&self.variables[idx].spec)
    }

    fn parents(&self, name: &str) -> Result<Vec<String>, NetworkError> {
        self.index_of(name)?;
        Ok(self
            .arcs
            .iter()
            .filter(|(_, to)| to == name)
            .map(|(from, _)| from.clone())
            .collect())
    }

    fn names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn arcs(&self) -> Vec<(String, String)> {
        self.arcs.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net_abc() -> MemoryNetwork {
        let mut net = MemoryNetwork::new();
        for name in ["A", "B", "C"] {
            net.add_variable(name, VariableSpec::labelized()).unwrap();
        }
        net
    }

    #[test]
    fn add_variable_registers_uniform_table() {
        let net = {
            let mut net = MemoryNetwork::new();
            net.add_variable("X", VariableSpec::ranged(1, 4).unwrap())
                .unwrap();
            net
        };
        let cpt = net.cpt("X").unwrap();
        assert_eq!(cpt.row_count(), 1);
        assert_eq!(cpt.rows()[0], vec![0.25; 4]);
    }

    #[test]
    fn add_arc_rejects_cycle() {
        let mut net = net_abc();
        net.add_arc("A", "B").unwrap();
        net.add_arc("B", "C").unwrap();
        let err = net.add_arc("C", "A").unwrap_err();
        assert!(matches!(err, NetworkError::CycleDetected { .. }));
        assert_eq!(net.arcs().len(), 2);
    }

    #[test]
    fn add_arc_rejects_reverse_as_cycle() {
        let mut net = net_abc();
        net.add_arc("A", "B").unwrap();
        let err = net.add_arc("B", "A").unwrap_err();
        assert!(matches!(err, NetworkError::CycleDetected { .. }));
    }

    #[test]
    fn arc_changes_resize_target_table() {
        let mut net = net_abc();
        net.add_arc("A", "C").unwrap();
        net.add_arc("B", "C").unwrap();
        assert_eq!(net.cpt("C").unwrap().row_count(), 4);
        assert_eq!(net.parents("C").unwrap(), ["A", "B"]);

        net.erase_arc("A", "C").unwrap();
        assert_eq!(net.cpt("C").unwrap().row_count(), 2);
        assert_eq!(net.parents("C").unwrap(), ["B"]);
    }

    #[test]
    fn erase_variable_cascades_arcs_and_resizes_children() {
        let mut net = net_abc();
        net.add_arc("A", "B").unwrap();
        net.add_arc("B", "C").unwrap();
        net.erase_variable("B").unwrap();

        assert_eq!(net.names(), ["A", "C"]);
        assert!(net.arcs().is_empty());
        assert_eq!(net.cpt("C").unwrap().row_count(), 1);
        assert!(matches!(
            net.cpt("B").unwrap_err(),
            NetworkError::UnknownVariable(_)
        ));
    }

    #[test]
    fn fill_cpt_rejects_stale_dimensions() {
        let mut net = net_abc();
        net.add_arc("A", "B").unwrap();
        // Table shaped as if B had no parents.
        let stale = Cpt::uniform(2, vec![]);
        assert!(matches!(
            net.fill_cpt("B", stale).unwrap_err(),
            NetworkError::BadTable(_)
        ));
    }
}
