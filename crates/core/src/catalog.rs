//! Catalog resource model.
//!
//! A catalog is addressed by its `name`, not its `id`: every single-resource
//! request routes on the name, so a rename moves the resource to a new path.

use serde::{Deserialize, Serialize};

/// A catalog as returned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Server-assigned identifier. Opaque and immutable.
    pub id: String,
    /// Unique name within the collection; the routing key.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub comment: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last modification time in epoch milliseconds, if ever updated.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// One page of catalogs.
///
/// `next_page_token` is opaque and passed back verbatim by callers that page;
/// this crate does not follow it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCatalogsResponse {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of `POST /catalogs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCatalogRequest {
    pub name: String,
    pub comment: String,
}

impl CreateCatalogRequest {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }
}

/// Body of `PATCH /catalogs/{name}`.
///
/// `name` is both the target of the request and the name sent in the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCatalogRequest {
    pub name: String,
    pub comment: String,
}

impl UpdateCatalogRequest {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }
}

/// Error payload returned by the server on failure.
///
/// Only `message` is read; everything else in the body is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
