use std::time::Duration;
use thiserror::Error;

/// Default HTTP port for health checks
const DEFAULT_HTTP_PORT: u16 = 5000;

/// Error type for healthcheck failures
#[derive(Error, Debug)]
#[error("Healthcheck failed: {0}")]
pub struct HealthcheckError(String);

/// Perform a health check against `HTTP_PORT` (default 5000)
pub async fn healthcheck() -> Result<(), HealthcheckError> {
    let port = configured_port(|name| std::env::var(name).ok())?;
    healthcheck_with_port(port).await
}

/// Port the server listens on, as configured through `HTTP_PORT`.
fn configured_port<F>(lookup: F) -> Result<u16, HealthcheckError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("HTTP_PORT") {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| HealthcheckError(format!("Invalid HTTP_PORT='{raw}': {e}"))),
        _ => Ok(DEFAULT_HTTP_PORT),
    }
}

/// Perform a health check against a specific port
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| HealthcheckError(format!("Failed to create HTTP client: {e}")))?;

    let url = format!("http://127.0.0.1:{port}/v1/health");

    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| HealthcheckError(format!("Request failed: {e}")))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(HealthcheckError(format!(
            "Health endpoint returned status: {}",
            resp.status()
        )))
    }
}
