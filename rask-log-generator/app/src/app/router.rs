use super::state::AppState;
use crate::handler::api_logs::api_logs_handler;
use crate::handler::failure::error_handler;
use crate::handler::generate::generate_handler;
use crate::handler::health::health_handler;
use crate::handler::home::home_handler;
use crate::handler::system::system_handler;
use axum::Router;
use axum::routing::get;

/// Build the HTTP router (demo pages + health).
pub fn main_router(state: AppState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let demo_router = Router::new()
        .route("/", get(home_handler))
        .route("/generate", get(generate_handler))
        .route("/api/logs", get(api_logs_handler))
        .route("/api/system", get(system_handler))
        .route("/error", get(error_handler))
        .with_state(state);

    Router::new().merge(v1_health_router).merge(demo_router)
}
