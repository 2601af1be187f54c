//! Cache keys for read operations.

use std::fmt;

/// Identifies one cached read.
///
/// The list has a single entry for the whole collection; single catalogs
/// have one entry per name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `listCatalogs`
    ListCatalogs,
    /// `getCatalog` + name
    GetCatalog(String),
}

impl QueryKey {
    pub fn get_catalog(name: impl Into<String>) -> Self {
        Self::GetCatalog(name.into())
    }

    /// The operation tag this key is filed under.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ListCatalogs => "listCatalogs",
            Self::GetCatalog(_) => "getCatalog",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListCatalogs => f.write_str(self.tag()),
            Self::GetCatalog(name) => write!(f, "{}/{}", self.tag(), name),
        }
    }
}
