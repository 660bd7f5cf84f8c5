//! Graph construction from package records.
//!
//! # Overview
//!
//! [`DependencyGraph::build`] takes the flat list produced by the package
//! loader, assigns every package a node in a petgraph arena, resolves each
//! declared dependency name, and then runs the topological sort and the
//! closure calculation. Construction is all-or-nothing: the first structural
//! error aborts it.
//!
//! ## Content Hash
//!
//! The graph carries a BLAKE3 hash of its package list: every name in input
//! order, followed by its declared dependencies. The order and closures are a
//! pure function of that list, so two graphs with the same hash assign the
//! same [`NodeIndex`] to every package. Selections record the hash of the
//! graph that made them and are rejected by any other graph. Callers may
//! also store it to decide whether files generated from a previous graph are
//! stale.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::graph::closure::{self, RedundantDependency};
use crate::graph::topo;
use crate::package::Package;

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// Resolved, validated, and topologically ordered package graph.
///
/// Built once per command invocation and read-only afterwards. All lookups
/// take a [`NodeIndex`] obtained from [`DependencyGraph::lookup`] or from
/// [`DependencyGraph::order`].
#[derive(Debug, Clone)]
pub struct DependencyGraph<M = ()> {
    /// Arena of packages; edge `p → q` means p requires q.
    graph: DiGraph<Package<M>, ()>,
    by_name: HashMap<String, NodeIndex>,
    /// Direct dependencies in declared order (duplicates preserved).
    required: Vec<Vec<NodeIndex>>,
    /// Direct dependents, mirror image of `required`.
    dependent: Vec<Vec<NodeIndex>>,
    order: Vec<NodeIndex>,
    /// Position of each node in `order`.
    rank: Vec<usize>,
    all_required: Vec<Vec<NodeIndex>>,
    uniq_required: Vec<Vec<NodeIndex>>,
    redundant: Vec<RedundantDependency>,
    fingerprint: blake3::Hash,
}

impl<M> DependencyGraph<M> {
    /// Build the graph from package records.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicatePackage`] if two packages share a name.
    /// - [`GraphError::UnresolvedDependency`] if a dependency names no package.
    /// - [`GraphError::CircularDependency`] if the dependencies form a cycle.
    #[instrument(skip_all, fields(packages = packages.len()))]
    pub fn build(packages: Vec<Package<M>>, config: &GraphConfig) -> Result<Self, GraphError> {
        let mut graph = DiGraph::<Package<M>, ()>::with_capacity(packages.len(), 0);
        let mut by_name: HashMap<String, NodeIndex> = HashMap::with_capacity(packages.len());

        for (position, package) in packages.into_iter().enumerate() {
            if let Some(previous) = by_name.get(package.name()) {
                return Err(GraphError::DuplicatePackage {
                    name: package.name().to_string(),
                    entry: position + 1,
                    previous_entry: previous.index() + 1,
                });
            }
            let name = package.name().to_string();
            let idx = graph.add_node(package);
            by_name.insert(name, idx);
        }

        let (required, dependent) = resolve_edges(&graph, &by_name)?;

        for (from, deps) in required.iter().enumerate() {
            let from = NodeIndex::new(from);
            for &to in deps {
                // Repeated declarations share one arena edge.
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let order = topo::topological_order(&graph, &required)?;

        let mut rank = vec![0; order.len()];
        for (position, idx) in order.iter().enumerate() {
            rank[idx.index()] = position;
        }

        let closures = closure::compute(&graph, &order, &required, config);
        let fingerprint = compute_fingerprint(&graph, &required);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            redundant = closures.redundant.len(),
            "dependency graph built"
        );

        Ok(Self {
            graph,
            by_name,
            required,
            dependent,
            order,
            rank,
            all_required: closures.all_required,
            uniq_required: closures.uniq_required,
            redundant: closures.redundant,
            fingerprint,
        })
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up a package's index by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NodeIndex> {
        self.by_name.get(name).copied()
    }

    /// Look up a package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package<M>> {
        self.lookup(name).map(|idx| &self.graph[idx])
    }

    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    #[must_use]
    pub fn package(&self, idx: NodeIndex) -> &Package<M> {
        &self.graph[idx]
    }

    /// Name of the package at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` does not belong to this graph.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> &str {
        self.graph[idx].name()
    }

    /// Names for a slice of indices, in the same order.
    #[must_use]
    pub fn names(&self, ids: &[NodeIndex]) -> Vec<&str> {
        ids.iter().map(|&idx| self.name(idx)).collect()
    }

    /// All packages in topological order: every package appears after
    /// everything it requires.
    #[must_use]
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Packages in topological order.
    pub fn ordered_packages(&self) -> impl Iterator<Item = &Package<M>> + '_ {
        self.order.iter().map(|&idx| &self.graph[idx])
    }

    /// Position of `idx` within [`DependencyGraph::order`].
    #[must_use]
    pub fn rank(&self, idx: NodeIndex) -> usize {
        self.rank[idx.index()]
    }

    /// Direct dependencies, in declared order.
    #[must_use]
    pub fn required(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.required[idx.index()]
    }

    /// Direct dependents, in resolution order.
    #[must_use]
    pub fn dependent(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.dependent[idx.index()]
    }

    /// Direct neighbours in the given direction.
    ///
    /// [`Direction::Outgoing`] yields [`required`](Self::required),
    /// [`Direction::Incoming`] yields [`dependent`](Self::dependent).
    #[must_use]
    pub fn adjacent(&self, idx: NodeIndex, direction: Direction) -> &[NodeIndex] {
        match direction {
            Direction::Outgoing => self.required(idx),
            Direction::Incoming => self.dependent(idx),
        }
    }

    /// Transitive closure of the package's dependencies, excluding itself.
    ///
    /// The sequence is itself dependency-ordered.
    #[must_use]
    pub fn all_required(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.all_required[idx.index()]
    }

    /// Direct dependencies that are not implied by another direct dependency.
    #[must_use]
    pub fn uniq_required(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.uniq_required[idx.index()]
    }

    /// Redundant dependency declarations found while building.
    #[must_use]
    pub fn redundant(&self) -> &[RedundantDependency] {
        &self.redundant
    }

    /// BLAKE3 hash of the package list and declared edges (`blake3:<hex>`).
    #[must_use]
    pub fn content_hash(&self) -> String {
        format!("blake3:{}", self.fingerprint)
    }

    pub(crate) const fn fingerprint(&self) -> blake3::Hash {
        self.fingerprint
    }

    /// The underlying petgraph arena.
    #[must_use]
    pub const fn petgraph(&self) -> &DiGraph<Package<M>, ()> {
        &self.graph
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

type Adjacency = Vec<Vec<NodeIndex>>;

/// Resolve every declared dependency name into forward and reverse adjacency.
fn resolve_edges<M>(
    graph: &DiGraph<Package<M>, ()>,
    by_name: &HashMap<String, NodeIndex>,
) -> Result<(Adjacency, Adjacency), GraphError> {
    let n = graph.node_count();
    let mut required: Adjacency = vec![Vec::new(); n];
    let mut dependent: Adjacency = vec![Vec::new(); n];

    for idx in graph.node_indices() {
        let package = &graph[idx];
        for dep_name in package.requires() {
            let Some(&dep) = by_name.get(dep_name) else {
                return Err(GraphError::UnresolvedDependency {
                    package: package.name().to_string(),
                    dependency: dep_name.clone(),
                });
            };
            required[idx.index()].push(dep);
            dependent[dep.index()].push(idx);
        }
    }

    Ok((required, dependent))
}

fn compute_fingerprint<M>(
    graph: &DiGraph<Package<M>, ()>,
    required: &[Vec<NodeIndex>],
) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for idx in graph.node_indices() {
        hasher.update(graph[idx].name().as_bytes());
        hasher.update(b"\x00");
        for &dep in &required[idx.index()] {
            hasher.update(graph[dep].name().as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\n");
    }
    hasher.finalize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
