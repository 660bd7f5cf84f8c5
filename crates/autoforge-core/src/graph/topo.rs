//! Topological ordering with cycle reporting.
//!
//! # Design
//!
//! - **Three-colour DFS** over `required` edges. Roots are taken in input
//!   order and dependencies in declared order, so the result depends only on
//!   the input list.
//! - **Post-order emission**: a package is appended once all its
//!   dependencies are, which puts dependencies first.
//! - **Explicit stack**: the DFS keeps its own frame stack, so long
//!   dependency chains cannot overflow the call stack. The gray frames on
//!   that stack are exactly the current path, which is what the cycle
//!   report prints.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;
use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// On the DFS stack.
    Gray,
    /// Emitted.
    Black,
}

/// Order all nodes so that every node follows its dependencies.
///
/// # Errors
///
/// Returns [`GraphError::CircularDependency`] with the cycle path (first and
/// last element equal) when a back edge is found.
pub(crate) fn topological_order<M>(
    graph: &DiGraph<Package<M>, ()>,
    required: &[Vec<NodeIndex>],
) -> Result<Vec<NodeIndex>, GraphError> {
    let n = graph.node_count();
    let mut color = vec![Color::White; n];
    let mut order = Vec::with_capacity(n);
    // (node, index of the next dependency to visit)
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for root in graph.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }
        color[root.index()] = Color::Gray;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            if let Some(&dep) = required[node.index()].get(next) {
                frame.1 += 1;
                match color[dep.index()] {
                    Color::White => {
                        color[dep.index()] = Color::Gray;
                        stack.push((dep, 0));
                    }
                    Color::Gray => return Err(cycle_error(graph, &stack, dep)),
                    Color::Black => {}
                }
            } else {
                color[node.index()] = Color::Black;
                order.push(node);
                stack.pop();
            }
        }
    }

    Ok(order)
}

/// Build the cycle path `dep -> ... -> top of stack -> dep`.
fn cycle_error<M>(
    graph: &DiGraph<Package<M>, ()>,
    stack: &[(NodeIndex, usize)],
    dep: NodeIndex,
) -> GraphError {
    let start = stack
        .iter()
        .position(|&(node, _)| node == dep)
        .unwrap_or_default();

    let path = stack[start..]
        .iter()
        .map(|&(node, _)| node)
        .chain(std::iter::once(dep))
        .map(|node| graph[node].name().to_string())
        .collect();

    GraphError::CircularDependency { path }
}
