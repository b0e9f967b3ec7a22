use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    accounts::AccountsService, newsletter::NewsletterService,
    storage::snapshot_store::SnapshotStore,
};

pub mod api;
pub mod auth;

/// Shared handler state: the snapshot store plus the services built on it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub accounts: AccountsService,
    pub newsletter: NewsletterService,
}

impl AppState {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            accounts: AccountsService::new(Arc::clone(&store)),
            newsletter: NewsletterService::new(Arc::clone(&store)),
            store,
        }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "OK" })
}

/// Build the full application router: static site, health, and the JSON API
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new("public").fallback(ServeFile::new("public/index.html"));

    // JSON API routes; anything else falls through to the static site
    Router::new()
        .route("/api/health", get(health))
        .route("/api/recommendations", get(api::recommendations))
        .route("/api/chat", post(api::chat))
        .route("/api/newsletter", post(api::subscribe_newsletter))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .with_state(state)
        .fallback_service(static_dir)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 请求到达时打点
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
