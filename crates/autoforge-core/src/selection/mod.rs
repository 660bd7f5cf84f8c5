//! Package selections.
//!
//! A [`Selection`] is a subset of the graph's packages kept in the graph's
//! topological order, whatever order the user named them in. Downstream
//! generators rely on that to process a selection front to back. Only a
//! [`DependencyGraph`] can create one, and it remembers which graph did (by
//! content hash): handing it to another graph is a
//! [`SelectionError::ForeignSelection`], not a panic. Selections come from:
//!
//! - [`DependencyGraph::select`] evaluates range tokens (see [`range`]).
//! - [`DependencyGraph::selection_from_ids`] wraps an arbitrary id set.
//! - [`persist::read_selection`] restores a saved selection file.
//!
//! [`DependencyGraph::reduce_selection`] derives the [`SelectionGraph`]: the
//! minimal ordering constraints between the selected packages.

pub mod persist;
pub mod range;
pub mod reduce;

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::error::SelectionError;
use crate::graph::DependencyGraph;

pub use persist::{read_selection, write_selection};
pub use range::RangeToken;
pub use reduce::SelectionGraph;

/// Selected packages in topological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    graph: blake3::Hash,
    packages: Vec<NodeIndex>,
}

impl Selection {
    /// Whether this selection was made by `graph` (or an identical rebuild).
    #[must_use]
    pub fn belongs_to<M>(&self, graph: &DependencyGraph<M>) -> bool {
        self.graph == graph.fingerprint()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.packages.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.packages
    }

    #[must_use]
    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.packages.contains(&idx)
    }
}

impl<M> DependencyGraph<M> {
    /// Evaluate range tokens left to right.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NoSuchPackage`] for the first token naming
    /// an unknown package.
    #[instrument(skip_all, fields(tokens = tokens.len()))]
    pub fn select<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Selection, SelectionError> {
        let mut selector = range::Selector::new(self);
        for token in tokens {
            selector.apply(RangeToken::parse(token.as_ref()))?;
        }

        let packages = selector.finish();
        debug!(selected = packages.len(), "selection evaluated");
        Ok(Selection {
            graph: self.fingerprint(),
            packages,
        })
    }

    /// Build a selection from package ids, reordering them topologically and
    /// dropping duplicates.
    ///
    /// # Panics
    ///
    /// Panics if an id is out of range for this graph. Ids must come from
    /// this graph's [`lookup`](Self::lookup) or [`order`](Self::order).
    pub fn selection_from_ids(&self, ids: impl IntoIterator<Item = NodeIndex>) -> Selection {
        let mut packages: Vec<NodeIndex> = ids.into_iter().collect();
        packages.sort_by_key(|&idx| self.rank(idx));
        packages.dedup();
        Selection {
            graph: self.fingerprint(),
            packages,
        }
    }

    /// Names of the selected packages, in selection order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ForeignSelection`] if `selection` was made by
    /// a different graph.
    pub fn selection_names(&self, selection: &Selection) -> Result<Vec<&str>, SelectionError> {
        self.check_selection(selection)?;
        Ok(self.names(selection.as_slice()))
    }

    /// Minimal ordering constraints between the selected packages.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::ForeignSelection`] if `selection` was made by
    /// a different graph.
    pub fn reduce_selection(
        &self,
        selection: &Selection,
    ) -> Result<SelectionGraph, SelectionError> {
        self.check_selection(selection)?;
        Ok(reduce::reduce(self, selection))
    }

    fn check_selection(&self, selection: &Selection) -> Result<(), SelectionError> {
        if selection.belongs_to(self) {
            Ok(())
        } else {
            Err(SelectionError::ForeignSelection)
        }
    }
}
