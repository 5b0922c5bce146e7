use rask_log_generator::app::router::main_router;
use rask_log_generator::app::state::AppState;
use rask_log_generator::config::Settings;
use rask_log_generator::test_support::{FixedProbe, RecordingSink};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Test that healthcheck succeeds against the real router
#[tokio::test]
async fn test_healthcheck_succeeds_when_server_running() {
    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let state = AppState::new(
        Settings::default(),
        Arc::new(RecordingSink::new()),
        Arc::new(FixedProbe::new()),
    );
    let server = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, main_router(state)).await.unwrap();
    });

    // Wait for server to start
    sleep(Duration::from_millis(100)).await;

    let result = rask_log_generator::healthcheck_with_port(port).await;
    assert!(
        result.is_ok(),
        "Healthcheck should succeed when server is running"
    );

    server.abort();
}

/// Test that healthcheck fails when server is not running
#[tokio::test]
async fn test_healthcheck_fails_when_server_not_running() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = rask_log_generator::healthcheck_with_port(port).await;
    assert!(
        result.is_err(),
        "Healthcheck should fail when server is not running"
    );
}

/// Test that healthcheck fails when server returns non-2xx status
#[tokio::test]
async fn test_healthcheck_fails_on_non_success_status() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    // Start a mock server that returns 503
    let mock_server = tokio::spawn(async move {
        let app = axum::Router::new().route(
            "/v1/health",
            axum::routing::get(|| async {
                (axum::http::StatusCode::SERVICE_UNAVAILABLE, "Unhealthy")
            }),
        );
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, app).await.unwrap();
    });

    sleep(Duration::from_millis(100)).await;

    let result = rask_log_generator::healthcheck_with_port(port).await;
    assert!(result.is_err(), "Healthcheck should fail on non-2xx status");

    mock_server.abort();
}

/// Test that the subcommand entry point checks the port from `HTTP_PORT`
#[tokio::test]
async fn test_healthcheck_uses_configured_http_port() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let state = AppState::new(
        Settings::default(),
        Arc::new(RecordingSink::new()),
        Arc::new(FixedProbe::new()),
    );
    let server = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, main_router(state)).await.unwrap();
    });

    sleep(Duration::from_millis(100)).await;

    // SAFETY: no other test in this binary reads or writes HTTP_PORT
    unsafe { std::env::set_var("HTTP_PORT", port.to_string()) };
    let result = rask_log_generator::healthcheck().await;
    assert!(
        result.is_ok(),
        "Healthcheck should follow HTTP_PORT: {result:?}"
    );

    server.abort();
}
