use crate::adapter::{SysinfoProbe, TcpLineSink};
use crate::config::Settings;
use crate::generation::GenerationContext;
use crate::port::{LineSink, SystemProbe};
use crate::synth::LifecycleEvent;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::warn;

const FALLBACK_HOSTNAME: &str = "localhost";

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub sink: Arc<dyn LineSink>,
    pub probe: Arc<dyn SystemProbe>,
    pub hostname: Arc<str>,
    /// Background generation runs, awaited on shutdown.
    pub generation_tasks: TaskTracker,
    /// Cancelled when the server shuts down.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(settings: Settings, sink: Arc<dyn LineSink>, probe: Arc<dyn SystemProbe>) -> Self {
        Self {
            settings: Arc::new(settings),
            sink,
            probe,
            hostname: local_hostname(),
            generation_tasks: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Create `AppState` wired to the TCP collector and the host probe.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let sink: Arc<dyn LineSink> = Arc::new(TcpLineSink::new(
            settings.collector.clone(),
            settings.sink_timeout,
        ));
        let probe: Arc<dyn SystemProbe> = Arc::new(SysinfoProbe::new());
        Self::new(settings, sink, probe)
    }

    pub fn generation_context(&self) -> GenerationContext {
        GenerationContext {
            settings: self.settings.clone(),
            sink: self.sink.clone(),
            hostname: self.hostname.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Send a record describing a request to the collector and wait for it.
    pub async fn log_event(&self, event: LifecycleEvent<'_>) {
        let record = event.into_record(&self.hostname, &mut rand::rng());
        self.sink.send(&record).await;
    }

    /// Like `log_event`, without holding up the caller.
    pub fn log_event_detached(&self, event: LifecycleEvent<'_>) {
        let record = event.into_record(&self.hostname, &mut rand::rng());
        let sink = self.sink.clone();
        self.generation_tasks.spawn(async move {
            sink.send(&record).await;
        });
    }
}

fn local_hostname() -> Arc<str> {
    match hostname::get() {
        Ok(name) => Arc::from(name.to_string_lossy().as_ref()),
        Err(e) => {
            warn!("Failed to resolve hostname, using {FALLBACK_HOSTNAME}: {e}");
            Arc::from(FALLBACK_HOSTNAME)
        }
    }
}
