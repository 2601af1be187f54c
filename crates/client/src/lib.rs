//! HTTP client for the catalog API with a client-side query cache.
//!
//! - [`CatalogApi`]: one HTTP request per operation, no caching
//! - [`QueryCache`]: keyed read cache with invalidation
//! - [`CatalogClient`]: the two combined; reads are cached and successful
//!   writes invalidate the keys they affect

pub mod api;
pub mod cache;
pub mod catalogs;
pub mod config;
pub mod error;

pub use api::CatalogApi;
pub use cache::{EntryState, QueryCache};
pub use catalogs::CatalogClient;
pub use config::load_client_config;
pub use error::{ClientError, ClientResult, Operation};
pub use ucat_core::{
    Catalog, ClientConfig, CreateCatalogRequest, ListCatalogsResponse, QueryKey,
    UpdateCatalogRequest,
};
