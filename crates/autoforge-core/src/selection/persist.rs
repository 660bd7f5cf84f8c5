//! Saved selections: a flat file with one package name per line.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::SelectionFileError;
use crate::graph::DependencyGraph;
use crate::selection::Selection;

/// Write `selection` to `path`, one name per line, creating the parent
/// directory if needed.
///
/// # Errors
///
/// - [`SelectionFileError::Selection`] if `selection` was made by another
///   graph. Nothing is written in that case.
/// - [`SelectionFileError::Write`] if the directory or file cannot be
///   written.
pub fn write_selection<M>(
    graph: &DependencyGraph<M>,
    selection: &Selection,
    path: &Path,
) -> Result<(), SelectionFileError> {
    let names = graph.selection_names(selection)?;
    let write_err = |source| SelectionFileError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut contents = String::new();
    for name in names {
        contents.push_str(name);
        contents.push('\n');
    }
    fs::write(path, contents).map_err(write_err)?;

    debug!(path = %path.display(), packages = selection.len(), "selection saved");
    Ok(())
}

/// Read a selection saved by [`write_selection`].
///
/// Blank lines are ignored. The result is put back into topological order,
/// so a hand-edited file is still safe to build from.
///
/// # Errors
///
/// - [`SelectionFileError::Read`] if the file cannot be read.
/// - [`SelectionFileError::UnknownPackage`] for a name the graph does not
///   contain.
pub fn read_selection<M>(
    graph: &DependencyGraph<M>,
    path: &Path,
) -> Result<Selection, SelectionFileError> {
    let contents = fs::read_to_string(path).map_err(|source| SelectionFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_selection(graph, &contents)
}

/// Resolve the contents of a selection file against `graph`.
///
/// # Errors
///
/// Returns [`SelectionFileError::UnknownPackage`] for the first unknown name.
pub fn parse_selection<M>(
    graph: &DependencyGraph<M>,
    contents: &str,
) -> Result<Selection, SelectionFileError> {
    let ids = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|name| {
            graph
                .lookup(name)
                .ok_or_else(|| SelectionFileError::UnknownPackage(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(graph.selection_from_ids(ids))
}
