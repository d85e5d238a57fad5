pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Admin gateway + webapp verification
    let api = Router::new()
        .route("/chats/remove-user", post(routes::chats::remove_user))
        .route("/chats/sent-invitation", post(routes::chats::sent_invitation))
        .route("/verify-webapp", post(routes::verify::verify_webapp));

    Router::new()
        .nest("/api", api)
        .route("/generate-invite", get(routes::invite::generate_invite))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
