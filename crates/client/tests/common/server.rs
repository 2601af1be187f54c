//! In-process catalog server for end-to-end client tests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use ucat_client::{CatalogClient, ClientConfig};
use ucat_core::{Catalog, CreateCatalogRequest, ListCatalogsResponse, UpdateCatalogRequest};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/2.1/unity-catalog";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: String,
    message: String,
}

#[derive(Debug)]
enum FakeError {
    NotFound(String),
    Conflict(String),
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::NotFound(m) => (StatusCode::NOT_FOUND, "NOT_FOUND", m),
            Self::Conflict(m) => (StatusCode::CONFLICT, "ALREADY_EXISTS", m),
        };
        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Shared state of the fake server.
#[derive(Clone, Default)]
pub struct FakeState {
    catalogs: Arc<Mutex<Vec<Catalog>>>,
    list_hits: Arc<AtomicUsize>,
    get_hits: Arc<AtomicUsize>,
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

async fn list_catalogs(State(state): State<FakeState>) -> Json<ListCatalogsResponse> {
    state.list_hits.fetch_add(1, Ordering::SeqCst);
    let catalogs = state.catalogs.lock().unwrap().clone();
    Json(ListCatalogsResponse {
        catalogs,
        next_page_token: None,
    })
}

async fn create_catalog(
    State(state): State<FakeState>,
    Json(req): Json<CreateCatalogRequest>,
) -> Result<(StatusCode, Json<Catalog>), FakeError> {
    let mut catalogs = state.catalogs.lock().unwrap();
    if catalogs.iter().any(|c| c.name == req.name) {
        return Err(FakeError::Conflict(format!(
            "Catalog already exists: {}",
            req.name
        )));
    }
    let catalog = Catalog {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        comment: req.comment,
        created_at: now_millis(),
        updated_at: None,
    };
    catalogs.push(catalog.clone());
    Ok((StatusCode::CREATED, Json(catalog)))
}

async fn get_catalog(
    State(state): State<FakeState>,
    Path(name): Path<String>,
) -> Result<Json<Catalog>, FakeError> {
    state.get_hits.fetch_add(1, Ordering::SeqCst);
    let catalogs = state.catalogs.lock().unwrap();
    catalogs
        .iter()
        .find(|c| c.name == name)
        .cloned()
        .map(Json)
        .ok_or_else(|| FakeError::NotFound(format!("Catalog not found: {name}")))
}

async fn update_catalog(
    State(state): State<FakeState>,
    Path(name): Path<String>,
    Json(req): Json<UpdateCatalogRequest>,
) -> Result<Json<Catalog>, FakeError> {
    let mut catalogs = state.catalogs.lock().unwrap();
    let catalog = catalogs
        .iter_mut()
        .find(|c| c.name == name)
        .ok_or_else(|| FakeError::NotFound(format!("Catalog not found: {name}")))?;
    catalog.name = req.name;
    catalog.comment = req.comment;
    catalog.updated_at = Some(now_millis());
    Ok(Json(catalog.clone()))
}

async fn delete_catalog(
    State(state): State<FakeState>,
    Path(name): Path<String>,
) -> Result<StatusCode, FakeError> {
    let mut catalogs = state.catalogs.lock().unwrap();
    let before = catalogs.len();
    catalogs.retain(|c| c.name != name);
    if catalogs.len() == before {
        return Err(FakeError::NotFound(format!("Catalog not found: {name}")));
    }
    Ok(StatusCode::OK)
}

fn create_router(state: FakeState) -> Router {
    Router::new()
        .route(
            &format!("{API_PREFIX}/catalogs"),
            get(list_catalogs).post(create_catalog),
        )
        .route(
            &format!("{API_PREFIX}/catalogs/{{name}}"),
            get(get_catalog)
                .patch(update_catalog)
                .delete(delete_catalog),
        )
        .with_state(state)
}

/// A running fake server.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestCatalogServer {
    pub base_url: String,
    pub state: FakeState,
    task: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestCatalogServer {
    pub async fn start() -> Self {
        super::init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = FakeState::default();
        let router = create_router(state.clone());

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            task,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
    }

    pub fn client(&self) -> CatalogClient {
        CatalogClient::from_config(&self.config()).expect("Failed to build client")
    }

    pub fn list_hits(&self) -> usize {
        self.state.list_hits.load(Ordering::SeqCst)
    }

    pub fn get_hits(&self) -> usize {
        self.state.get_hits.load(Ordering::SeqCst)
    }
}

impl Drop for TestCatalogServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
