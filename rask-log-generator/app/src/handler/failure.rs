use super::UserQuery;
use super::client_ip::ClientIp;
use crate::app::state::AppState;
use crate::domain::LogLevel;
use crate::synth::LifecycleEvent;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::error;

/// Handler for GET /error
///
/// Performs a division by zero on purpose so that an ERROR record shows up in
/// the pipeline. Always answers 200.
pub async fn error_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<UserQuery>,
) -> (StatusCode, &'static str) {
    let username = query.username.as_deref().unwrap_or("anonymous");

    let reason = match divide(1, 0) {
        Ok(quotient) => format!("expected a division by zero, got {quotient}"),
        Err(reason) => reason,
    };
    let message = format!("Error occurred: {reason}");
    error!("{message}");

    state
        .log_event(
            LifecycleEvent::request(username, "/error", &ip, message).with_level(LogLevel::Error),
        )
        .await;

    (StatusCode::OK, "Error logged")
}

fn divide(numerator: u32, denominator: u32) -> Result<u32, String> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| "division by zero".to_string())
}
