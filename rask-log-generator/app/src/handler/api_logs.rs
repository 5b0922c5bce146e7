use super::client_ip::ClientIp;
use crate::app::state::AppState;
use crate::domain::ApiLogEntry;
use crate::synth::{LifecycleEvent, api_log_entries};
use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::info;

const DEFAULT_COUNT: usize = 10;
const MAX_COUNT: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct ApiLogsQuery {
    pub count: Option<usize>,
    pub username: Option<String>,
}

/// Handler for GET /api/logs
pub async fn api_logs_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<ApiLogsQuery>,
) -> Json<Vec<ApiLogEntry>> {
    let username = query.username.as_deref().unwrap_or("anonymous");
    let count = query.count.unwrap_or(DEFAULT_COUNT).min(MAX_COUNT);

    let entries = api_log_entries(&mut rand::rng(), count);

    let message = format!("API logs requested: {count} entries by {username}");
    state
        .log_event(
            LifecycleEvent::request(username, "/api/logs", &ip, message.clone())
                .with_parameters(format!("count={count}")),
        )
        .await;
    info!("{message}");

    Json(entries)
}
