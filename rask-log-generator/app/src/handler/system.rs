use super::UserQuery;
use super::client_ip::ClientIp;
use crate::app::state::AppState;
use crate::domain::LogLevel;
use crate::synth::LifecycleEvent;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, info};

/// Handler for GET /api/system
pub async fn system_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<UserQuery>,
) -> Response {
    let username = query.username.as_deref().unwrap_or("anonymous");

    match state.probe.snapshot().await {
        Ok(metrics) => {
            let message = format!(
                "System metrics requested by {username}: cpu {:.1}%, memory {:.1}%, disk {:.1}%",
                metrics.cpu, metrics.memory.percent, metrics.disk.percent
            );
            state
                .log_event(LifecycleEvent::request(username, "/api/system", &ip, message.clone()))
                .await;
            info!("{message}");
            (StatusCode::OK, Json(metrics)).into_response()
        }
        Err(e) => {
            let message = format!("Failed to collect system metrics: {e}");
            error!("{message}");
            state
                .log_event(
                    LifecycleEvent::request(username, "/api/system", &ip, message)
                        .with_level(LogLevel::Error),
                )
                .await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
