//! Core types shared by the catalog client crates.
//!
//! This crate defines:
//! - The catalog data model and request payloads
//! - Query keys used by the client-side cache
//! - Client configuration types

pub mod catalog;
pub mod config;
pub mod error;
pub mod query_key;

pub use catalog::{
    Catalog, CreateCatalogRequest, ErrorBody, ListCatalogsResponse, UpdateCatalogRequest,
};
pub use config::{CacheConfig, ClientConfig};
pub use error::{Error, Result};
pub use query_key::QueryKey;

/// Default path prefix of the catalog REST API.
pub const DEFAULT_API_PREFIX: &str = "/api/2.1/unity-catalog";
