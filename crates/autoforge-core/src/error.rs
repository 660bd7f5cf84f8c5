//! Error types for graph construction, selection, and selection files.
//!
//! Structural errors ([`GraphError`]) abort graph construction; they are
//! authoring mistakes in package definitions and are surfaced verbatim.
//! [`SelectionError`] aborts a single selection call. Redundant dependency
//! declarations are advisories and never appear here.

use std::io;
use std::path::PathBuf;

/// Errors that abort dependency graph construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Two packages share a name.
    ///
    /// `entry` and `previous_entry` are 1-based positions in the input list;
    /// the earlier declaration is always reported as `previous_entry`.
    #[error("duplicate package name: {name} (entry {entry}; previously declared as entry {previous_entry})")]
    DuplicatePackage {
        name: String,
        entry: usize,
        previous_entry: usize,
    },

    /// A declared dependency does not name any known package.
    #[error("package '{package}' requires '{dependency}', which is not defined")]
    UnresolvedDependency { package: String, dependency: String },

    /// The declared dependencies form a cycle.
    ///
    /// `path` starts and ends at the same package, e.g. `["a", "b", "a"]`.
    #[error("circular dependency detected: {}", .path.join(" -> "))]
    CircularDependency { path: Vec<String> },
}

impl GraphError {
    /// Return the cycle path if this is a [`GraphError::CircularDependency`].
    #[must_use]
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            Self::CircularDependency { path } => Some(path),
            _ => None,
        }
    }
}

/// Errors produced while evaluating range tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no such package: {0}")]
    NoSuchPackage(String),

    /// A selection (or selection graph) was passed to a graph other than the
    /// one that produced it.
    #[error("selection belongs to a different package graph")]
    ForeignSelection,
}

/// Errors produced while reading or writing a selection file.
#[derive(Debug, thiserror::Error)]
pub enum SelectionFileError {
    #[error("failed to read selection file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write selection file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The file names a package that is no longer in the package path.
    #[error("previously selected package '{0}' could not be found")]
    UnknownPackage(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}
