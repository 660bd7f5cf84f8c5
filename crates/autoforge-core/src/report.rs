//! Text, JSON, and DOT renderings of graph data for listing commands.
//!
//! Each report is a serializable payload plus a human renderer. [`render`]
//! picks between them:
//!
//! ```ignore
//! let payload = package_list(&graph, graph.order());
//! render(OutputMode::Text, &payload, &mut out, render_package_list)?;
//! ```

use std::io::{self, Write};

use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::error::SelectionError;
use crate::graph::{DependencyGraph, RedundantDependency};
use crate::selection::SelectionGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Write `value` as pretty JSON or through `human_fn`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    w: &mut dyn Write,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)?;
        }
        OutputMode::Text => human_fn(value, w)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Package list
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PackageEntry<'a> {
    pub name: &'a str,
    pub requires: &'a [String],
    pub all_required: Vec<&'a str>,
    pub uniq_required: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct PackageListPayload<'a> {
    pub packages: Vec<PackageEntry<'a>>,
}

/// Collect listing entries for `ids`, in the given order.
#[must_use]
pub fn package_list<'a, M>(
    graph: &'a DependencyGraph<M>,
    ids: &[NodeIndex],
) -> PackageListPayload<'a> {
    let packages = ids
        .iter()
        .map(|&idx| PackageEntry {
            name: graph.name(idx),
            requires: graph.package(idx).requires(),
            all_required: graph.names(graph.all_required(idx)),
            uniq_required: graph.names(graph.uniq_required(idx)),
        })
        .collect();
    PackageListPayload { packages }
}

/// `List of packages:` followed by each name and its declared dependencies.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_package_list(
    payload: &PackageListPayload<'_>,
    w: &mut dyn Write,
) -> io::Result<()> {
    writeln!(w, "List of packages:")?;
    for entry in &payload.packages {
        writeln!(w, "{}", entry.name)?;
        for dep in entry.requires {
            writeln!(w, "- {dep}")?;
        }
    }
    Ok(())
}

/// Closure and reduced dependencies of every listed package.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_closures(payload: &PackageListPayload<'_>, w: &mut dyn Write) -> io::Result<()> {
    for entry in &payload.packages {
        writeln!(w, "{}", entry.name)?;
        writeln!(w, "  all:    {}", entry.all_required.join(" "))?;
        writeln!(w, "  direct: {}", entry.uniq_required.join(" "))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Redundancy advisories
// ---------------------------------------------------------------------------

/// One advisory per line.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_redundancy(redundant: &[RedundantDependency], w: &mut dyn Write) -> io::Result<()> {
    if redundant.is_empty() {
        writeln!(w, "No redundant dependencies.")?;
        return Ok(());
    }
    for advisory in redundant {
        writeln!(w, "{advisory}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Selection graph
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SelectionGraphEntry<'a> {
    pub name: &'a str,
    pub after: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SelectionGraphPayload<'a> {
    pub packages: Vec<SelectionGraphEntry<'a>>,
}

/// # Errors
///
/// Returns [`SelectionError::ForeignSelection`] if `reduced` came from
/// another graph.
pub fn selection_graph<'a, M>(
    graph: &'a DependencyGraph<M>,
    reduced: &SelectionGraph,
) -> Result<SelectionGraphPayload<'a>, SelectionError> {
    if !reduced.belongs_to(graph) {
        return Err(SelectionError::ForeignSelection);
    }
    let packages = reduced
        .iter()
        .map(|(idx, deps)| SelectionGraphEntry {
            name: graph.name(idx),
            after: graph.names(deps),
        })
        .collect();
    Ok(SelectionGraphPayload { packages })
}

/// One line per selected package: `name: dep dep`.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_selection_graph(
    payload: &SelectionGraphPayload<'_>,
    w: &mut dyn Write,
) -> io::Result<()> {
    for entry in &payload.packages {
        if entry.after.is_empty() {
            writeln!(w, "{}:", entry.name)?;
        } else {
            writeln!(w, "{}: {}", entry.name, entry.after.join(" "))?;
        }
    }
    Ok(())
}

/// Graphviz rendering of a selection graph.
///
/// # Errors
///
/// Returns [`SelectionError::ForeignSelection`] if `reduced` came from
/// another graph.
pub fn selection_graph_dot<M>(
    graph: &DependencyGraph<M>,
    reduced: &SelectionGraph,
) -> Result<String, SelectionError> {
    let labelled = reduced
        .to_digraph(graph)?
        .map(|_, name| name.clone(), |_, ()| "");
    Ok(Dot::with_config(&labelled, &[Config::EdgeNoLabel]).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::package::Package;

    fn diamond() -> DependencyGraph {
        let packages = vec![
            Package::new("d", ["b", "c"]),
            Package::new("b", ["a"]),
            Package::new("c", ["a"]),
            Package::new("a", Vec::<String>::new()),
        ];
        DependencyGraph::build(packages, &GraphConfig::default()).expect("build")
    }

    fn text<T: Serialize>(
        value: &T,
        human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    ) -> String {
        let mut out = Vec::new();
        render(OutputMode::Text, value, &mut out, human_fn).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn package_list_text() {
        let graph = diamond();
        let rendered = text(&package_list(&graph, graph.order()), render_package_list);
        assert_eq!(rendered, "List of packages:\na\nb\n- a\nc\n- a\nd\n- b\n- c\n");
    }

    #[test]
    fn package_list_json() {
        let graph = diamond();
        let mut out = Vec::new();
        render(
            OutputMode::Json,
            &package_list(&graph, graph.order()),
            &mut out,
            render_package_list,
        )
        .expect("render");

        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["packages"][3]["name"], "d");
        assert_eq!(value["packages"][3]["all_required"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(value["packages"][3]["uniq_required"], serde_json::json!(["b", "c"]));
    }

    #[test]
    fn closures_text() {
        let graph = diamond();
        let d = graph.lookup("d").expect("d");
        let rendered = text(&package_list(&graph, &[d]), render_closures);
        assert_eq!(rendered, "d\n  all:    a b c\n  direct: b c\n");
    }

    #[test]
    fn redundancy_text() {
        let mut out = Vec::new();
        render_redundancy(&[], &mut out).expect("render");
        assert_eq!(String::from_utf8(out).expect("utf8"), "No redundant dependencies.\n");

        let mut out = Vec::new();
        let advisory = RedundantDependency {
            package: "x".into(),
            dependency: "a".into(),
        };
        render_redundancy(&[advisory], &mut out).expect("render");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "x: redundant dependency on a\n"
        );
    }

    #[test]
    fn selection_graph_text_and_dot() {
        let graph = diamond();
        let selection = graph.select(&["a", "d"]).expect("select");
        let reduced = graph.reduce_selection(&selection).expect("reduce");

        let payload = selection_graph(&graph, &reduced).expect("payload");
        let rendered = text(&payload, render_selection_graph);
        assert_eq!(rendered, "a:\nd: a\n");

        let dot = selection_graph_dot(&graph, &reduced).expect("dot");
        assert!(dot.starts_with("digraph"), "{dot}");
        assert!(dot.contains("\"a\""), "{dot}");
        assert!(dot.contains("1 -> 0"), "{dot}");

        let other = DependencyGraph::build(
            vec![Package::new("z", Vec::<String>::new())],
            &GraphConfig::default(),
        )
        .expect("build");
        assert!(selection_graph(&other, &reduced).is_err());
        assert_eq!(
            selection_graph_dot(&other, &reduced),
            Err(SelectionError::ForeignSelection)
        );
    }
}
