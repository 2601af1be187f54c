//! Request layer: one HTTP request per catalog operation.
//!
//! Nothing here touches the cache; see [`crate::CatalogClient`] for the
//! cached façade.

use crate::error::{ClientError, ClientResult, Operation};
use reqwest::Url;
use serde::de::DeserializeOwned;
use ucat_core::{
    Catalog, ClientConfig, CreateCatalogRequest, ErrorBody, ListCatalogsResponse,
    UpdateCatalogRequest,
};

const CATALOGS: &str = "catalogs";

#[derive(Clone)]
pub struct CatalogApi {
    http: reqwest::Client,
    /// Server origin with the API prefix already applied.
    base_url: Url,
    token: Option<String>,
}

impl CatalogApi {
    pub fn new(base_url: &str, api_prefix: &str, token: Option<&str>) -> ClientResult<Self> {
        if !api_prefix.is_empty() && !api_prefix.starts_with('/') {
            return Err(ClientError::Url(format!(
                "API prefix must start with '/': {api_prefix}"
            )));
        }
        let mut base_url =
            Url::parse(base_url).map_err(|e| ClientError::Url(format!("invalid server URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(format!(
                "server URL cannot be a base: {base_url}"
            )));
        }
        let path = format!("{}{}", base_url.path().trim_end_matches('/'), api_prefix);
        base_url.set_path(&path);

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.map(str::to_string),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config
            .validate()
            .map_err(|e| ClientError::Config(ucat_core::Error::Config(e)))?;
        Self::new(&config.base_url, &config.api_prefix, config.token.as_deref())
    }

    /// Root of the API, prefix included.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{prefix}/catalogs`, or `{prefix}/catalogs/{name}` with `name` as one
    /// percent-encoded segment.
    fn url(&self, name: Option<&str>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Url(format!("cannot extend URL {}", self.base_url)))?;
            segments.pop_if_empty().push(CATALOGS);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        operation: Operation,
        req: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let request = req
            .build()
            .map_err(|e| transport_error(operation, None, e))?;

        tracing::debug!(
            operation = %operation,
            method = %request.method(),
            path = request.url().path(),
            "sending catalog request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| transport_error(operation, None, e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = if operation.reads_error_body() {
            let body = response.text().await.unwrap_or_default();
            server_message(&body)
        } else {
            None
        };

        tracing::warn!(
            operation = %operation,
            status = status.as_u16(),
            server_message = message.as_deref().unwrap_or(""),
            "catalog request failed"
        );

        Err(ClientError::RequestFailed {
            operation,
            status: Some(status.as_u16()),
            message: message.unwrap_or_else(|| operation.failure_message().to_string()),
            source: None,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        req: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(operation, req).await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(operation, Some(status), e))?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { operation, source })
    }

    /// `GET {prefix}/catalogs`
    pub async fn list_catalogs(&self) -> ClientResult<ListCatalogsResponse> {
        let url = self.url(None)?;
        self.send_json(Operation::List, self.http.get(url)).await
    }

    /// `GET {prefix}/catalogs/{name}`
    pub async fn get_catalog(&self, name: &str) -> ClientResult<Catalog> {
        let url = self.url(Some(name))?;
        self.send_json(Operation::Get, self.http.get(url)).await
    }

    /// `POST {prefix}/catalogs`
    pub async fn create_catalog(&self, req: &CreateCatalogRequest) -> ClientResult<Catalog> {
        let url = self.url(None)?;
        self.send_json(Operation::Create, self.http.post(url).json(req))
            .await
    }

    /// `PATCH {prefix}/catalogs/{name}`, where `name` comes from the request.
    pub async fn update_catalog(&self, req: &UpdateCatalogRequest) -> ClientResult<Catalog> {
        let url = self.url(Some(&req.name))?;
        self.send_json(Operation::Update, self.http.patch(url).json(req))
            .await
    }

    /// `DELETE {prefix}/catalogs/{name}`. The response body is ignored.
    pub async fn delete_catalog(&self, name: &str) -> ClientResult<()> {
        let url = self.url(Some(name))?;
        self.send(Operation::Delete, self.http.delete(url)).await?;
        Ok(())
    }
}

fn transport_error(operation: Operation, status: Option<u16>, err: reqwest::Error) -> ClientError {
    tracing::warn!(operation = %operation, error = %err, "catalog request did not complete");
    ClientError::RequestFailed {
        operation,
        status,
        message: operation.failure_message().to_string(),
        source: Some(err),
    }
}

/// Non-empty `message` field of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}
