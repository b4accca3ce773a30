//! Axum router construction.
//!
//! Builds the full application router with the API routes, middleware
//! layers, the uploaded-image file service, and the landing page.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = match ctx.config.server.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let api = Router::new()
        .route("/photos", get(routes::photos::list_photos))
        .route("/photos/{name}", delete(routes::photos::delete_photo))
        .route("/reorder", post(routes::photos::reorder_photos));

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/upload",
            post(routes::photos::upload_photo).layer(body_limit),
        )
        .nest("/api", api)
        .nest_service("/images", ServeDir::new(ctx.uploads.root()));

    // Landing page.
    if let Some(ref dir) = ctx.config.server.static_dir {
        let index_path = dir.join("index.html");
        if index_path.exists() {
            tracing::info!("Serving landing page from {:?}", index_path);
        } else {
            tracing::warn!("Landing page {:?} not found", index_path);
        }
        app = app.route_service("/", ServeFile::new(index_path));
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
