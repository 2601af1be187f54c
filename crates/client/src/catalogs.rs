//! Cached catalog operations.

use crate::api::CatalogApi;
use crate::cache::QueryCache;
use crate::error::ClientResult;
use std::sync::Arc;
use ucat_core::{
    Catalog, ClientConfig, CreateCatalogRequest, ListCatalogsResponse, QueryKey,
    UpdateCatalogRequest,
};

/// Catalog operations backed by a shared query cache.
///
/// Reads go through the cache. Successful writes invalidate the keys whose
/// contents they change; failed writes leave the cache untouched.
#[derive(Clone)]
pub struct CatalogClient {
    api: CatalogApi,
    cache: Arc<QueryCache>,
    invalidate_list_on_update: bool,
}

impl CatalogClient {
    pub fn new(api: CatalogApi, cache: Arc<QueryCache>) -> Self {
        Self {
            api,
            cache,
            invalidate_list_on_update: true,
        }
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let api = CatalogApi::from_config(config)?;
        let cache = Arc::new(QueryCache::from_config(&config.cache));
        Ok(Self::new(api, cache)
            .with_list_invalidation_on_update(config.cache.invalidate_list_on_update))
    }

    /// Whether a successful update also invalidates the catalog list.
    pub fn with_list_invalidation_on_update(mut self, enabled: bool) -> Self {
        self.invalidate_list_on_update = enabled;
        self
    }

    pub fn api(&self) -> &CatalogApi {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// List catalogs, cached under `listCatalogs`.
    pub async fn list_catalogs(&self) -> ClientResult<ListCatalogsResponse> {
        self.cache
            .read(&QueryKey::ListCatalogs, || self.api.list_catalogs())
            .await
    }

    /// Get one catalog, cached under `getCatalog` + `name`.
    pub async fn get_catalog(&self, name: &str) -> ClientResult<Catalog> {
        self.cache
            .read(&QueryKey::get_catalog(name), || self.api.get_catalog(name))
            .await
    }

    /// Create a catalog, then invalidate the list.
    pub async fn create_catalog(&self, req: &CreateCatalogRequest) -> ClientResult<Catalog> {
        let catalog = self.api.create_catalog(req).await?;
        tracing::debug!(catalog = %catalog.name, "catalog created");
        self.cache.invalidate(&QueryKey::ListCatalogs);
        Ok(catalog)
    }

    /// Update a catalog, then invalidate the entry for the name the server
    /// returned. The request name is not used for invalidation.
    pub async fn update_catalog(&self, req: &UpdateCatalogRequest) -> ClientResult<Catalog> {
        let catalog = self.api.update_catalog(req).await?;
        tracing::debug!(
            requested = %req.name,
            catalog = %catalog.name,
            "catalog updated"
        );
        self.cache.invalidate(&QueryKey::get_catalog(&catalog.name));
        if self.invalidate_list_on_update {
            self.cache.invalidate(&QueryKey::ListCatalogs);
        }
        Ok(catalog)
    }

    /// Delete a catalog, then invalidate the list.
    pub async fn delete_catalog(&self, name: &str) -> ClientResult<()> {
        self.api.delete_catalog(name).await?;
        tracing::debug!(catalog = %name, "catalog deleted");
        self.cache.invalidate(&QueryKey::ListCatalogs);
        Ok(())
    }
}
