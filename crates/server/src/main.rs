use std::{io, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::error::ApiError;
use tower_http::{
    services::{fs::ServeFileSystemResponseBody, ServeDir},
    set_header::SetResponseHeaderLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{ensure_site_root, load_settings, resolve_content_path};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const NO_STORE: &str = "no-store";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let site_root = ensure_site_root(&settings)?;
    let content_path = resolve_content_path(&settings);
    if !content_path.is_file() {
        warn!(
            path = %content_path.display(),
            "content fragment not found; content routes will return 404 until it exists"
        );
    }

    let state = AppState {
        site_root,
        content_path,
    };
    info!(
        site_root = %state.site_root.display(),
        content = %state.content_path.display(),
        "serving presentation"
    );
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let static_files = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            no_store_for_html,
        ))
        .service(ServeDir::new(&state.site_root));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/content-fragment", get(content_fragment))
        .route("/content/content.html", get(content_fragment))
        .fallback_service(static_files)
        .with_state(state)
}

/// Pages must always be refetched; other assets keep default caching.
fn no_store_for_html(response: &Response<ServeFileSystemResponseBody>) -> Option<HeaderValue> {
    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"));
    is_html.then(|| HeaderValue::from_static(NO_STORE))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn content_fragment(State(state): State<Arc<AppState>>) -> axum::response::Response {
    match tokio::fs::read_to_string(&state.content_path).await {
        Ok(html) => (
            [
                (header::CONTENT_TYPE, HTML_CONTENT_TYPE),
                (header::CACHE_CONTROL, NO_STORE),
            ],
            html,
        )
            .into_response(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %state.content_path.display(), "content fragment requested but missing");
            (StatusCode::NOT_FOUND, "Content not found").into_response()
        }
        Err(e) => {
            error!(path = %state.content_path.display(), error = %e, "failed to read content fragment");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal(format!(
                    "failed to read content fragment: {e}"
                ))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
