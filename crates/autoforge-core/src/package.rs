//! Package records as supplied by the package-definition loader.

/// One declared package.
///
/// `requires` keeps the order the author wrote; traversal tie-breaking
/// follows it. `metadata` is carried through the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package<M = ()> {
    name: String,
    requires: Vec<String>,
    metadata: M,
}

impl Package {
    /// Create a package with no metadata.
    pub fn new<I, S>(name: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_metadata(name, requires, ())
    }
}

impl<M> Package<M> {
    /// Create a package carrying caller-defined metadata.
    pub fn with_metadata<I, S>(name: impl Into<String>, requires: I, metadata: M) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
            metadata,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependency names exactly as declared.
    #[must_use]
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    #[must_use]
    pub const fn metadata(&self) -> &M {
        &self.metadata
    }
}
