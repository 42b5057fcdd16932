//! Axum router configuration with middleware.
//!
//! Chat routes are under `/api/gemini/`; `/health` sits at the root.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let gemini_routes = Router::new()
        .route("/request", post(handlers::gemini::request))
        .route("/new_chat", post(handlers::gemini::new_chat))
        .route("/load_chat", post(handlers::gemini::load_chat))
        .route(
            "/delete_chats",
            post(handlers::gemini::delete_chats).delete(handlers::gemini::delete_chats),
        )
        .route(
            "/current_session_id",
            get(handlers::gemini::current_session_id),
        )
        .route(
            "/all_chat_summaries",
            get(handlers::gemini::all_chat_summaries),
        );

    Router::new()
        .nest("/api/gemini", gemini_routes)
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
