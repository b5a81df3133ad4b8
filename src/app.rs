use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::project_repository::ProjectRepository;
use crate::db::repository::DocumentRepository;
use crate::db::share_link_repository::ShareLinkRepository;
use crate::rendering::footer::EmbedBranding;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub share_links: Arc<dyn ShareLinkRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    /// Shared secret for the publishing API.
    pub service_token: String,
    pub public_base_url: String,
    pub branding: EmbedBranding,
}

/// Public, unauthenticated routes called from customer websites.
///
/// Any origin may read them; nothing else is allowed cross-origin.
fn public_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/api/doc/{token}", get(api::share::doc_handler))
        .route("/api/embed/{token}", get(api::share::embed_handler))
        .layer(cors)
}

/// Service-token protected publishing routes.
fn publish_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/projects",
            post(api::publish::upsert_project_handler),
        )
        .route("/api/v1/documents", post(api::publish::publish_handler))
        .route(
            "/api/v1/share-links",
            post(api::publish::issue_link_handler),
        )
        .route(
            "/api/v1/share-links/revoke",
            post(api::publish::revoke_link_handler),
        )
}

/// Build the API router (no static files).
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(publish_routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Build the full router: API routes plus the static loader bundle.
pub fn build_router(state: AppState, site_root: &str) -> Router {
    api_router(state).fallback_service(ServeDir::new(site_root))
}
