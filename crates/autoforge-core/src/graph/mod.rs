//! Package dependency graph.
//!
//! # Pipeline
//!
//! ```text
//! Vec<Package<M>>
//!        ↓  build: name resolution, duplicate / unresolved checks
//! required + dependent adjacency (declared order)
//!        ↓  topo: three-colour DFS, cycle path on failure
//! order (dependencies before dependents)
//!        ↓  closure: folded in `order`
//! all_required + uniq_required (+ redundancy advisories)
//! ```
//!
//! The result is a [`DependencyGraph`], immutable once built. Every per-package
//! table is indexed by the package's [`NodeIndex`] in the underlying
//! petgraph arena.
//!
//! ## Edge Direction
//!
//! An edge `p → q` means "p requires q". [`Direction::Outgoing`] therefore
//! walks toward dependencies and [`Direction::Incoming`] toward dependents.
//!
//! [`NodeIndex`]: petgraph::graph::NodeIndex
//! [`Direction::Outgoing`]: petgraph::Direction::Outgoing
//! [`Direction::Incoming`]: petgraph::Direction::Incoming

pub mod build;
pub mod closure;
mod topo;

pub use build::DependencyGraph;
pub use closure::RedundantDependency;
