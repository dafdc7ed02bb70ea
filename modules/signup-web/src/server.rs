use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use activities_client::ActivitiesApi;
use signup_common::Config;

use crate::controller::ViewController;
use crate::events::UiEvent;
use crate::page::ViewMode;
use crate::session::Session;
use crate::templates::{render_page, render_regions};

type Controller = ViewController<dyn ActivitiesApi>;

// --- App State ---

struct PageSlot {
    controller: Arc<Mutex<Controller>>,
    last_seen: Instant,
}

/// Pages currently open in browsers, one controller each. A page load always
/// starts a new public session, so reloading drops admin mode.
pub struct AppState {
    api: Arc<dyn ActivitiesApi>,
    pages: Mutex<HashMap<Uuid, PageSlot>>,
    message_ttl: Duration,
    page_idle: Duration,
}

impl AppState {
    pub fn new(api: Arc<dyn ActivitiesApi>, config: &Config) -> Self {
        Self {
            api,
            pages: Mutex::new(HashMap::new()),
            message_ttl: config.message_ttl,
            page_idle: config.page_idle,
        }
    }

    pub async fn open_pages(&self) -> usize {
        self.pages.lock().await.len()
    }

    async fn open_page(&self) -> (Uuid, Arc<Mutex<Controller>>) {
        let controller = Arc::new(Mutex::new(ViewController::new(
            self.api.clone(),
            Session::public(),
            self.message_ttl,
        )));
        let id = Uuid::new_v4();
        let now = Instant::now();

        let mut pages = self.pages.lock().await;
        let before = pages.len();
        pages.retain(|_, slot| now.duration_since(slot.last_seen) < self.page_idle);
        if pages.len() < before {
            debug!(evicted = before - pages.len(), "Evicted idle pages");
        }
        pages.insert(
            id,
            PageSlot {
                controller: controller.clone(),
                last_seen: now,
            },
        );
        (id, controller)
    }

    async fn find_page(&self, id: Uuid) -> Option<Arc<Mutex<Controller>>> {
        let mut pages = self.pages.lock().await;
        let slot = pages.get_mut(&id)?;
        slot.last_seen = Instant::now();
        Some(slot.controller.clone())
    }
}

// --- Router ---

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/ui/{page_id}/events", post(handle_event))
        .route("/ui/{page_id}/regions", get(current_regions))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Logging layer: method + path only; queries and bodies can hold emails
                .layer(TraceLayer::new_for_http().make_span_with(
                    |request: &axum::http::Request<axum::body::Body>| {
                        tracing::info_span!(
                            "http_request",
                            method = %request.method(),
                            path = %request.uri().path(),
                        )
                    },
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
}

// --- Handlers ---

async fn index_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (id, controller) = state.open_page().await;
    let mut controller = controller.lock().await;
    controller.load_catalog(ViewMode::Public).await;
    info!(page = %id, "Page opened");

    Html(render_page(
        controller.page(),
        &id.to_string(),
        Instant::now(),
    ))
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: BTreeMap<&'static str, String>,
}

async fn handle_event(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<Uuid>,
    Json(event): Json<UiEvent>,
) -> Response {
    let Some(controller) = state.find_page(page_id).await else {
        return (StatusCode::NOT_FOUND, "Unknown page").into_response();
    };

    let mut controller = controller.lock().await;
    debug!(page = %page_id, action = event.name(), "Dispatching UI event");
    controller.dispatch(event).await;

    regions_response(&controller).into_response()
}

async fn current_regions(
    State(state): State<Arc<AppState>>,
    Path(page_id): Path<Uuid>,
) -> Response {
    let Some(controller) = state.find_page(page_id).await else {
        return (StatusCode::NOT_FOUND, "Unknown page").into_response();
    };

    let controller = controller.lock().await;
    regions_response(&controller).into_response()
}

fn regions_response(controller: &Controller) -> Json<RegionsResponse> {
    let regions = render_regions(controller.page(), Instant::now())
        .into_iter()
        .collect();
    Json(RegionsResponse { regions })
}
