use autoforge_core::config::load_config;
use autoforge_core::report::{self, OutputMode};
use autoforge_core::{
    DependencyGraph, GraphConfig, Package, SelectionError, SelectionFileError, read_selection,
    write_selection,
};
use petgraph::algo::has_path_connecting;
use petgraph::graph::NodeIndex;
use proptest::prelude::*;

use generators::*;

// ---------------------------------------------------------------------------
// Reference evaluator
// ---------------------------------------------------------------------------

/// Evaluate tokens by brute-force reachability queries, one package at a time.
fn reference_select(graph: &DependencyGraph, tokens: &[String]) -> Vec<String> {
    let petgraph = graph.petgraph();
    let depends_on = |p: NodeIndex, q: NodeIndex| has_path_connecting(petgraph, p, q, None);
    let idx = |name: &str| graph.lookup(name).expect("generated names exist");

    let mut inclusion = true;
    let mut selected = vec![false; graph.len()];
    for token in tokens {
        let affected: Box<dyn Fn(NodeIndex) -> bool + '_> = match token.as_str() {
            "+" => {
                inclusion = true;
                continue;
            }
            "-" => {
                inclusion = false;
                continue;
            }
            _ => match token.split_once(':') {
                None => {
                    let p = idx(token);
                    Box::new(move |n| n == p)
                }
                Some((from, "")) => {
                    let p = idx(from);
                    Box::new(move |n| depends_on(n, p))
                }
                Some(("", to)) => {
                    let p = idx(to);
                    Box::new(move |n| depends_on(p, n))
                }
                Some((from, to)) => {
                    let (from, to) = (idx(from), idx(to));
                    Box::new(move |n| depends_on(n, from) && depends_on(to, n))
                }
            },
        };
        for &n in graph.order() {
            if affected(n) {
                selected[n.index()] = inclusion;
            }
        }
    }

    graph
        .order()
        .iter()
        .filter(|n| selected[n.index()])
        .map(|&n| graph.name(n).to_string())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn select_matches_reference(
        (packages, tokens) in arb_dag(12).prop_flat_map(|packages| {
            let n = packages.len();
            (Just(packages), proptest::collection::vec(arb_token(n), 0..8))
        })
    ) {
        let graph = DependencyGraph::build(packages, &GraphConfig { quiet: true })
            .expect("acyclic input");
        let selection = graph.select(tokens.as_slice()).expect("known names");

        let ranks: Vec<usize> = selection.iter().map(|idx| graph.rank(idx)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]), "selection follows build order");

        prop_assert_eq!(
            graph.selection_names(&selection).expect("own selection"),
            reference_select(&graph, &tokens)
        );
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

fn toolkit() -> DependencyGraph {
    let packages = vec![
        Package::new("editor", ["widgets", "syntax", "core"]),
        Package::new("widgets", ["render"]),
        Package::new("syntax", ["core"]),
        Package::new("render", ["core"]),
        Package::new("core", Vec::<String>::new()),
        Package::new("docs", Vec::<String>::new()),
    ];
    DependencyGraph::build(packages, &GraphConfig { quiet: true }).expect("build toolkit")
}

#[test]
fn redundant_declaration_is_reported_and_reduced() {
    let graph = toolkit();
    let editor = graph.lookup("editor").expect("editor");
    assert_eq!(graph.names(graph.uniq_required(editor)), ["widgets", "syntax"]);

    let advisories: Vec<String> = graph.redundant().iter().map(ToString::to_string).collect();
    assert_eq!(advisories, ["editor: redundant dependency on core"]);
}

#[test]
fn select_reduce_and_render() {
    let graph = toolkit();
    let selection = graph
        .select(&["core:editor", "-", "syntax", "+", "docs"])
        .expect("select");
    assert_eq!(
        graph.selection_names(&selection).expect("names"),
        ["core", "render", "widgets", "editor", "docs"]
    );

    let reduced = graph.reduce_selection(&selection).expect("reduce");
    let mut out = Vec::new();
    report::render(
        OutputMode::Text,
        &report::selection_graph(&graph, &reduced).expect("payload"),
        &mut out,
        report::render_selection_graph,
    )
    .expect("render");
    assert_eq!(
        String::from_utf8(out).expect("utf8"),
        "core:\nrender: core\nwidgets: render\neditor: widgets\ndocs:\n"
    );
}

#[test]
fn unknown_name_fails_the_whole_call() {
    let graph = toolkit();
    assert_eq!(
        graph.select(&["core", "-", "ghost:"]),
        Err(SelectionError::NoSuchPackage("ghost".into()))
    );
}

#[test]
fn saved_selection_survives_a_rebuild() {
    let workspace = tempfile::tempdir().expect("tempdir");
    let config = load_config(workspace.path()).expect("default config");
    let path = config.selection.path(workspace.path());

    let graph = toolkit();
    let selection = graph.select(&[":widgets"]).expect("select");
    write_selection(&graph, &selection, &path).expect("save");

    let rebuilt = toolkit();
    let restored = read_selection(&rebuilt, &path).expect("restore");
    assert_eq!(
        rebuilt.selection_names(&restored).expect("names"),
        ["core", "render", "widgets"]
    );

    // A package removed from the project invalidates the saved selection.
    let shrunk = DependencyGraph::build(
        vec![Package::new("core", Vec::<String>::new())],
        &GraphConfig::default(),
    )
    .expect("build");
    let err = read_selection(&shrunk, &path).expect_err("render is gone");
    assert!(matches!(err, SelectionFileError::UnknownPackage(name) if name == "render"));
}

#[test]
fn selection_is_bound_to_its_graph() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("selected");
    let toolkit = toolkit();
    let small = DependencyGraph::build(
        vec![Package::new("z", Vec::<String>::new())],
        &GraphConfig::default(),
    )
    .expect("build");

    let selection = toolkit.select(&["editor"]).expect("select");
    assert_eq!(
        small.reduce_selection(&selection),
        Err(SelectionError::ForeignSelection)
    );

    let selection = toolkit.select(&["core", "render"]).expect("select");
    let err = write_selection(&small, &selection, &path).expect_err("foreign selection");
    assert!(matches!(
        err,
        SelectionFileError::Selection(SelectionError::ForeignSelection)
    ));
    assert!(!path.exists());

    let reduced = toolkit.reduce_selection(&selection).expect("reduce");
    assert!(report::selection_graph_dot(&small, &reduced).is_err());
}
