#![forbid(unsafe_code)]
//! autoforge-core: the package dependency graph engine.
//!
//! Package records go in, a validated [`DependencyGraph`] comes out: a
//! topological build order, per-package dependency closures, redundancy
//! advisories, and a content hash. Selections of packages are evaluated
//! against that graph from range tokens and reduced to the minimal ordering
//! constraints between the selected packages.
//!
//! ```
//! use autoforge_core::{DependencyGraph, GraphConfig, Package};
//!
//! let graph = DependencyGraph::build(
//!     vec![Package::new("app", ["lib"]), Package::new("lib", Vec::<String>::new())],
//!     &GraphConfig::default(),
//! )?;
//! let selection = graph.select(&[":app"])?;
//! assert_eq!(graph.selection_names(&selection)?, ["lib", "app"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Typed `thiserror` enums from [`error`] for graph and
//!   selection failures; `anyhow::Result` for configuration and reporting.
//! - **Logging**: `tracing` macros only. The crate never installs a
//!   subscriber.

pub mod config;
pub mod error;
pub mod graph;
pub mod package;
pub mod report;
pub mod selection;

pub use config::{GraphConfig, ProjectConfig, SelectionConfig, load_config};
pub use error::{GraphError, SelectionError, SelectionFileError};
pub use graph::{DependencyGraph, RedundantDependency};
pub use package::Package;
pub use selection::{RangeToken, Selection, SelectionGraph, read_selection, write_selection};
