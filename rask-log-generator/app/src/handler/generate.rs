use super::client_ip::ClientIp;
use crate::app::state::AppState;
use crate::domain::GenerationTarget;
use crate::error::GeneratorError;
use crate::generation::spawn_generation;
use crate::synth::LifecycleEvent;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    pub count: Option<u64>,
    pub size_mb: Option<f64>,
    /// Size in GB
    pub size: Option<f64>,
    pub username: Option<String>,
}

impl GenerateQuery {
    /// `count` wins over `size_mb`, which wins over `size`.
    pub fn target(&self) -> Result<GenerationTarget, GeneratorError> {
        match (self.count, self.size_mb, self.size) {
            (Some(count), _, _) => Ok(GenerationTarget::count(count)),
            (None, Some(size_mb), _) => GenerationTarget::megabytes(size_mb),
            (None, None, Some(size_gb)) => GenerationTarget::gigabytes(size_gb),
            (None, None, None) => Err(GeneratorError::InvalidTarget(
                "one of count, size_mb or size (GB) is required".to_string(),
            )),
        }
    }
}

/// Handler for GET /generate
///
/// Starts a background run and acknowledges immediately; the run's outcome is
/// only visible in the collector and the service logs.
pub async fn generate_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<GenerateQuery>,
) -> (StatusCode, String) {
    let target = match query.target() {
        Ok(target) => target,
        Err(e) => {
            warn!("Rejected generation request: {e}");
            return (StatusCode::BAD_REQUEST, e.to_string());
        }
    };
    let username = query.username.as_deref().unwrap_or("system");
    let message = format!("Starting log generation: {target} by {username}");

    state.log_event_detached(
        LifecycleEvent::request(username, "/generate", &ip, message.clone())
            .with_parameters(target.as_parameters()),
    );
    info!("{message}");

    spawn_generation(
        &state.generation_tasks,
        state.generation_context(),
        target,
    );

    (
        StatusCode::OK,
        format!(
            "Started generating {target} of logs in the background. Check Kibana for progress."
        ),
    )
}
