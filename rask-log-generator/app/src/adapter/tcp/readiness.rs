use crate::config::{CollectorEndpoint, ReadinessPolicy};
use crate::error::GeneratorError;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

/// Probe the collector until a TCP connection succeeds.
///
/// One attempt per `policy.interval`, each bounded by `policy.attempt_timeout`.
/// Without `max_attempts` this only returns once the collector is reachable.
/// Returns the number of attempts it took.
pub async fn wait_until_reachable(
    endpoint: &CollectorEndpoint,
    policy: &ReadinessPolicy,
) -> Result<u32, GeneratorError> {
    let address = endpoint.address();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match timeout(policy.attempt_timeout, TcpStream::connect(&address)).await {
            Ok(Ok(_stream)) => {
                info!("Collector {address} reachable after {attempts} attempt(s)");
                return Ok(attempts);
            }
            Ok(Err(e)) => debug!("Collector {address} not ready (attempt {attempts}): {e}"),
            Err(_) => debug!("Collector {address} probe timed out (attempt {attempts})"),
        }

        if policy.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(GeneratorError::CollectorUnreachable { address, attempts });
        }
        if attempts == 1 {
            info!("Waiting for collector {address} to become reachable");
        }
        sleep(policy.interval).await;
    }
}
