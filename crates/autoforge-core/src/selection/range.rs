//! Range tokens and their evaluation.
//!
//! | token   | effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `+`     | following tokens include                                   |
//! | `-`     | following tokens exclude                                   |
//! | `name`  | the package itself                                         |
//! | `name:` | the package and everything that depends on it              |
//! | `:name` | the package and everything it depends on                   |
//! | `a:b`   | every package on a dependency path between `a` and `b`     |
//! | `:`     | nothing                                                    |
//!
//! Tokens apply left to right and the last token touching a package decides
//! whether it is selected.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::error::SelectionError;
use crate::graph::DependencyGraph;

/// One parsed range token. Names are not resolved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken<'a> {
    Include,
    Exclude,
    /// `name`
    Package(&'a str),
    /// `name:`
    Dependents(&'a str),
    /// `:name`
    Dependencies(&'a str),
    /// `from:to`
    Between { from: &'a str, to: &'a str },
    /// `:` or the empty string.
    Empty,
}

impl<'a> RangeToken<'a> {
    /// Parse a token, splitting at the first `:`.
    #[must_use]
    pub fn parse(token: &'a str) -> Self {
        match token {
            "+" => Self::Include,
            "-" => Self::Exclude,
            "" => Self::Empty,
            _ => match token.split_once(':') {
                None => Self::Package(token),
                Some(("", "")) => Self::Empty,
                Some((from, "")) => Self::Dependents(from),
                Some(("", to)) => Self::Dependencies(to),
                Some((from, to)) => Self::Between { from, to },
            },
        }
    }
}

/// Token evaluator holding the inclusion mode and per-package state.
///
/// `marks` and `visits` are generation stamps: bumping the counter
/// invalidates every previous stamp, so neither array is ever cleared
/// between tokens.
pub(crate) struct Selector<'g, M> {
    graph: &'g DependencyGraph<M>,
    inclusion: bool,
    selected: Vec<bool>,
    marks: Vec<u32>,
    generation: u32,
    visits: Vec<u32>,
    walk: u32,
    queue: VecDeque<NodeIndex>,
}

impl<'g, M> Selector<'g, M> {
    pub fn new(graph: &'g DependencyGraph<M>) -> Self {
        let n = graph.len();
        Self {
            graph,
            inclusion: true,
            selected: vec![false; n],
            marks: vec![0; n],
            generation: 0,
            visits: vec![0; n],
            walk: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn apply(&mut self, token: RangeToken<'_>) -> Result<(), SelectionError> {
        trace!(?token, inclusion = self.inclusion, "range token");
        match token {
            RangeToken::Include => self.inclusion = true,
            RangeToken::Exclude => self.inclusion = false,
            RangeToken::Empty => {}
            RangeToken::Package(name) => {
                let idx = self.resolve(name)?;
                self.selected[idx.index()] = self.inclusion;
            }
            RangeToken::Dependents(name) => {
                let idx = self.resolve(name)?;
                for node in self.traverse(idx, Direction::Incoming) {
                    self.selected[node.index()] = self.inclusion;
                }
            }
            RangeToken::Dependencies(name) => {
                let idx = self.resolve(name)?;
                for node in self.traverse(idx, Direction::Outgoing) {
                    self.selected[node.index()] = self.inclusion;
                }
            }
            RangeToken::Between { from, to } => {
                let from = self.resolve(from)?;
                let to = self.resolve(to)?;

                self.generation += 1;
                for node in self.traverse(to, Direction::Outgoing) {
                    self.marks[node.index()] = self.generation;
                }
                for node in self.traverse(from, Direction::Incoming) {
                    if self.marks[node.index()] == self.generation {
                        self.selected[node.index()] = self.inclusion;
                    }
                }
            }
        }
        Ok(())
    }

    /// Selected packages in topological order.
    pub fn finish(self) -> Vec<NodeIndex> {
        self.graph
            .order()
            .iter()
            .copied()
            .filter(|idx| self.selected[idx.index()])
            .collect()
    }

    fn resolve(&self, name: &str) -> Result<NodeIndex, SelectionError> {
        self.graph
            .lookup(name)
            .ok_or_else(|| SelectionError::NoSuchPackage(name.to_string()))
    }

    /// Breadth-first walk from `root` (inclusive) in `direction`.
    fn traverse(&mut self, root: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let graph = self.graph;
        self.walk += 1;
        let mut visited = Vec::new();

        self.visits[root.index()] = self.walk;
        self.queue.push_back(root);

        while let Some(node) = self.queue.pop_front() {
            visited.push(node);
            for &next in graph.adjacent(node, direction) {
                if self.visits[next.index()] != self.walk {
                    self.visits[next.index()] = self.walk;
                    self.queue.push_back(next);
                }
            }
        }

        visited
    }
}
