use super::UserQuery;
use super::client_ip::ClientIp;
use crate::app::state::AppState;
use crate::synth::LifecycleEvent;
use axum::extract::{Query, State};
use axum::response::Html;
use tracing::info;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Handler for GET /
pub async fn home_handler(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Query(query): Query<UserQuery>,
) -> Html<&'static str> {
    let username = query.username.as_deref().unwrap_or("anonymous");
    let message = format!("Home page accessed by {username}");

    state
        .log_event(LifecycleEvent::request(username, "/", &ip, message.clone()))
        .await;
    info!("{message}");

    Html(INDEX_HTML)
}
