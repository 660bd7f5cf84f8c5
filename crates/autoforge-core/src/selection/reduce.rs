//! Transitive reduction of the dependency graph restricted to a selection.
//!
//! # Algorithm
//!
//! 1. Walk every package in topological order and compute its *bridge*: its
//!    reduced direct dependencies, with each unselected dependency replaced by
//!    that dependency's own bridge. Unselected packages are skipped over, so a
//!    selected package ends up attached to its nearest selected ancestors.
//! 2. Drop the bridges of unselected packages; they only existed for
//!    splicing.
//! 3. Reduce each remaining bridge with the same closure fold used for
//!    `uniq_required`: a bridge entry reachable through another entry is
//!    dropped.
//!
//! The result mentions selected packages only, and no two dependencies of
//! one package reach each other.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::SelectionError;
use crate::graph::DependencyGraph;
use crate::selection::Selection;

/// Selected packages mapped to the selected packages they must follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGraph {
    /// Fingerprint of the graph that produced this.
    graph: blake3::Hash,
    /// Entries in selection order.
    entries: Vec<(NodeIndex, Vec<NodeIndex>)>,
    position: HashMap<NodeIndex, usize>,
}

impl SelectionGraph {
    /// Whether this was reduced by `graph` (or an identical rebuild).
    #[must_use]
    pub fn belongs_to<M>(&self, graph: &DependencyGraph<M>) -> bool {
        self.graph == graph.fingerprint()
    }

    /// Dependencies of a selected package, or `None` if it is not selected.
    #[must_use]
    pub fn dependencies_of(&self, idx: NodeIndex) -> Option<&[NodeIndex]> {
        self.position
            .get(&idx)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Entries in selection (topological) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &[NodeIndex])> + '_ {
        self.entries
            .iter()
            .map(|(idx, deps)| (*idx, deps.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|(_, deps)| deps.len()).sum()
    }

    /// Convert to a petgraph graph labelled with package names.
    ///
    /// Edge `p → q` means p must be built after q, matching
    /// [`DependencyGraph`].
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ForeignSelection`] if `graph` did not
    /// produce this selection graph.
    pub fn to_digraph<M>(
        &self,
        graph: &DependencyGraph<M>,
    ) -> Result<DiGraph<String, ()>, SelectionError> {
        if !self.belongs_to(graph) {
            return Err(SelectionError::ForeignSelection);
        }
        let mut out = DiGraph::with_capacity(self.len(), self.edge_count());
        let mut nodes = HashMap::with_capacity(self.len());

        for (idx, _) in self.iter() {
            nodes.insert(idx, out.add_node(graph.name(idx).to_string()));
        }
        for (idx, deps) in self.iter() {
            for dep in deps {
                out.add_edge(nodes[&idx], nodes[dep], ());
            }
        }

        Ok(out)
    }
}

#[instrument(skip_all, fields(selected = selection.len()))]
pub(crate) fn reduce<M>(graph: &DependencyGraph<M>, selection: &Selection) -> SelectionGraph {
    let n = graph.len();
    let mut is_selected = vec![false; n];
    for idx in selection.iter() {
        is_selected[idx.index()] = true;
    }

    let mut bridge: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    for &p in graph.order() {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut edges = Vec::new();
        for &d in graph.uniq_required(p) {
            if is_selected[d.index()] {
                if seen.insert(d) {
                    edges.push(d);
                }
            } else {
                for &s in &bridge[d.index()] {
                    if seen.insert(s) {
                        edges.push(s);
                    }
                }
            }
        }
        bridge[p.index()] = edges;
    }

    let mut reach: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut entries = Vec::with_capacity(selection.len());
    let mut position = HashMap::with_capacity(selection.len());

    for p in selection.iter() {
        let deps = std::mem::take(&mut bridge[p.index()]);

        let implied: HashSet<NodeIndex> = deps
            .iter()
            .flat_map(|d| reach[d.index()].iter().copied())
            .collect();

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut closure = Vec::new();
        for &d in &deps {
            for &q in &reach[d.index()] {
                if seen.insert(q) {
                    closure.push(q);
                }
            }
            if seen.insert(d) {
                closure.push(d);
            }
        }
        reach[p.index()] = closure;

        let reduced: Vec<NodeIndex> = deps.into_iter().filter(|d| !implied.contains(d)).collect();
        position.insert(p, entries.len());
        entries.push((p, reduced));
    }

    let result = SelectionGraph {
        graph: graph.fingerprint(),
        entries,
        position,
    };
    debug!(edges = result.edge_count(), "selection graph reduced");
    result
}
