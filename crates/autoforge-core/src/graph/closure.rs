//! Transitive closure and per-package reduction of direct dependencies.
//!
//! Packages are processed in topological order, so the closure of every
//! direct dependency is final by the time its dependents are visited and no
//! recursion is needed.
//!
//! For package `p` and each declared dependency `r`, in declared order, the
//! closure of `r` is folded into `p`'s closure first and `r` itself after it.
//! The resulting sequence is dependency-ordered.
//!
//! A declaration `r` is **redundant** when `r` is already in the closure of
//! another declared dependency, or when it repeats an earlier declaration.
//! Redundant declarations stay in `required` but are left out of
//! `uniq_required`, and are reported as advisories.

use std::collections::HashSet;
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::warn;

use crate::config::GraphConfig;
use crate::package::Package;

/// A dependency declaration implied by another declaration of the same
/// package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RedundantDependency {
    pub package: String,
    pub dependency: String,
}

impl fmt::Display for RedundantDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: redundant dependency on {}", self.package, self.dependency)
    }
}

pub(crate) struct Closures {
    pub all_required: Vec<Vec<NodeIndex>>,
    pub uniq_required: Vec<Vec<NodeIndex>>,
    pub redundant: Vec<RedundantDependency>,
}

pub(crate) fn compute<M>(
    graph: &DiGraph<Package<M>, ()>,
    order: &[NodeIndex],
    required: &[Vec<NodeIndex>],
    config: &GraphConfig,
) -> Closures {
    let n = graph.node_count();
    let mut all_required: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut uniq_required: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut redundant = Vec::new();

    for &p in order {
        let deps = &required[p.index()];

        let implied: HashSet<NodeIndex> = deps
            .iter()
            .flat_map(|r| all_required[r.index()].iter().copied())
            .collect();

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut closure = Vec::new();
        let mut direct = Vec::new();
        let mut declared: HashSet<NodeIndex> = HashSet::new();

        for &r in deps {
            for &q in &all_required[r.index()] {
                if seen.insert(q) {
                    closure.push(q);
                }
            }
            if seen.insert(r) {
                closure.push(r);
            }

            let first_declaration = declared.insert(r);
            if first_declaration && !implied.contains(&r) {
                direct.push(r);
                continue;
            }

            let advisory = RedundantDependency {
                package: graph[p].name().to_string(),
                dependency: graph[r].name().to_string(),
            };
            if !config.quiet {
                warn!(
                    package = %advisory.package,
                    dependency = %advisory.dependency,
                    "redundant dependency declaration"
                );
            }
            redundant.push(advisory);
        }

        all_required[p.index()] = closure;
        uniq_required[p.index()] = direct;
    }

    Closures {
        all_required,
        uniq_required,
        redundant,
    }
}
