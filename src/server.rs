//! HTTP surface: page routes, the contact endpoint and health check.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::RevalidationCache;
use crate::client::ContentClient;
use crate::config::SiteConfig;
use crate::contact::{self, ContactForm, ContactSettings, Mailer, ResendMailer};
use crate::error::{ContactError, ServerError};
use crate::pages::{PageOutput, Route, SiteRenderer};

const NOT_FOUND: &str = "Not found";

/// Shared, immutable request context.
pub struct AppState {
    pub renderer: SiteRenderer,
    pub cache: RevalidationCache<PageOutput>,
    pub mailer: Arc<dyn Mailer>,
    pub contact: ContactSettings,
}

impl AppState {
    pub fn new(renderer: SiteRenderer, mailer: Arc<dyn Mailer>, contact: ContactSettings) -> Self {
        Self {
            renderer,
            cache: RevalidationCache::new(),
            mailer,
            contact,
        }
    }

    /// Build the production state from configuration.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ServerError> {
        let mut http = reqwest::Client::builder();
        if let Some(timeout) = config.http_timeout() {
            http = http.timeout(timeout);
        }
        let http = http.build()?;

        let client = ContentClient::with_http_client(http.clone(), config.cms_settings());
        let renderer = SiteRenderer::new(client, config.site_info());
        let mailer = Arc::new(ResendMailer::with_client(
            http,
            config.resend_api_key.clone(),
        ));
        Ok(Self::new(renderer, mailer, config.contact_settings()))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/games", get(games))
        .route("/game/{slug}", get(game))
        .route("/team/{slug}", get(member))
        .route("/contact", get(contact_page))
        .route("/api/contact", post(submit_contact))
        .route("/health", get(health))
        .fallback(fallback)
        .with_state(state)
}

/// Render every prerenderable route into the cache. Returns how many were stored.
pub async fn warm_cache(state: &AppState) -> usize {
    let mut stored = 0;
    for route in state.renderer.prerender_routes().await {
        let renderer = &state.renderer;
        if state
            .cache
            .prime(&route.path(), || renderer.render(&route))
            .await
        {
            stored += 1;
        }
    }
    info!(stored, "warmed page cache");
    stored
}

/// Bind and serve until the process is stopped.
pub async fn run(config: SiteConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(&config)?);
    if config.warm_cache {
        warm_cache(&state).await;
    }

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    info!(addr = %config.bind, "listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn serve_page(state: &AppState, route: Route) -> Response {
    let key = route.path();
    let policy = route.policy();
    let renderer = state.renderer.clone();
    let (page, cache_status) = state
        .cache
        .get_or_render(&key, policy, move || async move {
            renderer.render(&route).await
        })
        .await;
    debug!(key = %key, %cache_status, "serving page");

    let status = if page.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    let mut response = (status, Json(&page)).into_response();

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&policy.cache_control()) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cache_status.to_string()) {
        headers.insert("x-cache", value);
    }
    if page.degraded {
        headers.insert("x-content-degraded", HeaderValue::from_static("true"));
    }
    response
}

async fn home(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, Route::Home).await
}

async fn about(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, Route::About).await
}

async fn games(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, Route::Games).await
}

async fn game(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    serve_page(&state, Route::Game(slug)).await
}

async fn member(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    serve_page(&state, Route::Member(slug)).await
}

async fn contact_page(State(state): State<Arc<AppState>>) -> Response {
    serve_page(&state, Route::Contact).await
}

async fn submit_contact(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let form: ContactForm = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(e) => {
            debug!(error = %e, "rejecting malformed contact payload");
            return error_response(StatusCode::BAD_REQUEST, contact::MISSING_FIELDS);
        }
    };

    match contact::submit(state.mailer.as_ref(), &state.contact, &form).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(ContactError::Validation(message)) => {
            error_response(StatusCode::BAD_REQUEST, message)
        }
        Err(ContactError::Delivery(_)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, contact::DELIVERY_FAILED)
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn fallback() -> Response {
    error_response(StatusCode::NOT_FOUND, NOT_FOUND)
}
