use crate::commands::load_config;
use crate::output::document::render_document;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use eval_viewer::{SessionState, ViewOutcome, ViewerConfig};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Immutable per-server state. Page state travels in each request.
#[derive(Clone)]
struct AppState {
    source: Arc<PathBuf>,
    config: Arc<ViewerConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Action {
    Load,
    Next,
    Prev,
}

#[derive(Debug, Default, Deserialize)]
struct ViewParams {
    action: Option<Action>,
    page: Option<usize>,
    page_size: Option<usize>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request error: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub fn run(file: PathBuf, addr: &str, config_path: Option<&Path>) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid listen address: {addr}"))?;

    let state = AppState {
        source: Arc::new(file),
        config: Arc::new(config),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(serve(state, addr))?;

    Ok(ExitCode::from(0))
}

async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(source = %state.source.display(), "eval viewer listening on http://{addr}");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/view", get(view))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    respond(state, ViewParams::default()).await
}

async fn view(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, AppError> {
    respond(state, params).await
}

async fn respond(state: AppState, params: ViewParams) -> Result<Html<String>, AppError> {
    let action = params.action;
    let (session, outcome) = tokio::task::spawn_blocking(move || {
        apply_action(&state.source, &state.config, &params)
    })
    .await?;

    info!(
        ?action,
        page = session.page,
        page_size = session.page_size,
        table = outcome.has_table(),
        status = %outcome.status,
        "served view"
    );
    Ok(Html(render_document(&outcome, Some(session))))
}

/// Maps a request onto a session action. Without an action the requested
/// page is shown as is; `load` always starts over on page 1.
fn apply_action(
    source: &Path,
    config: &ViewerConfig,
    params: &ViewParams,
) -> (SessionState, ViewOutcome) {
    let state = SessionState {
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(config.page_size),
    };
    let source = Some(source);

    match params.action {
        Some(Action::Load) => SessionState::load(source, state.page_size, config),
        Some(Action::Next) => state.next(source, config),
        Some(Action::Prev) => state.prev(source, config),
        None => state.show(source, config),
    }
}
