use super::run::{GenerationLoop, LoopOptions, closing_event, failed_before_start};
use crate::adapter::tcp::wait_until_reachable;
use crate::config::{ReadinessPolicy, Settings};
use crate::domain::{GenerationReport, GenerationTarget};
use crate::error::GeneratorError;
use crate::port::LineSink;
use crate::synth::RecordSynthesizer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// Everything a background run needs, detached from the request that started it.
#[derive(Clone)]
pub struct GenerationContext {
    pub settings: Arc<Settings>,
    pub sink: Arc<dyn LineSink>,
    pub hostname: Arc<str>,
    /// Cancelled on shutdown; running loops stop with an error record.
    pub shutdown: CancellationToken,
}

/// Start one generation run on `tracker` and return its handle.
///
/// The run owns its synthesizer (fresh pools, optional seed) for its whole
/// lifetime. HTTP callers may drop the handle; the run then continues
/// independently until its target is met.
pub fn spawn_generation(
    tracker: &TaskTracker,
    ctx: GenerationContext,
    target: GenerationTarget,
) -> JoinHandle<GenerationReport> {
    tracker.spawn(run_generation(ctx, target))
}

/// Like `spawn_generation`, after sleeping `delay`.
pub fn spawn_delayed_generation(
    tracker: &TaskTracker,
    ctx: GenerationContext,
    target: GenerationTarget,
    delay: Duration,
) -> JoinHandle<GenerationReport> {
    tracker.spawn(async move {
        info!("Startup log generation of {target} scheduled in {delay:?}");
        tokio::select! {
            () = sleep(delay) => {}
            () = ctx.shutdown.cancelled() => {}
        }
        run_generation(ctx, target).await
    })
}

pub async fn run_generation(ctx: GenerationContext, target: GenerationTarget) -> GenerationReport {
    let started = Instant::now();

    if let Some(policy) = &ctx.settings.readiness
        && let Err(e) = wait_for_collector(&ctx, policy).await
    {
        error!("Log generation of {target} aborted: {e}");
        let report = failed_before_start(&e, started.elapsed());
        let record =
            closing_event(target, &report).into_record(&ctx.hostname, &mut rand::rng());
        ctx.sink.send(&record).await;
        return report;
    }

    let synthesizer = RecordSynthesizer::from_seed(
        ctx.hostname.clone(),
        ctx.settings.pool_size,
        ctx.settings.message_policy,
        ctx.settings.seed,
    );
    let options = LoopOptions::from_settings(&ctx.settings);

    GenerationLoop::new(synthesizer, ctx.sink, options)
        .with_cancellation(ctx.shutdown)
        .run(target)
        .await
}

async fn wait_for_collector(
    ctx: &GenerationContext,
    policy: &ReadinessPolicy,
) -> Result<u32, GeneratorError> {
    tokio::select! {
        result = wait_until_reachable(&ctx.settings.collector, policy) => result,
        () = ctx.shutdown.cancelled() => Err(GeneratorError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectorEndpoint;
    use crate::domain::{LogLevel, RunOutcome};
    use crate::test_support::RecordingSink;

    fn context(settings: Settings, sink: Arc<RecordingSink>) -> GenerationContext {
        GenerationContext {
            settings: Arc::new(settings),
            sink,
            hostname: Arc::from("launcher-host"),
            shutdown: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn test_spawned_run_can_be_awaited() {
        let sink = Arc::new(RecordingSink::new());
        let tracker = TaskTracker::new();
        let handle = spawn_generation(
            &tracker,
            context(Settings::default(), sink.clone()),
            GenerationTarget::Count(30),
        );

        let report = handle.await.unwrap();
        assert_eq!(report.records, 30);
        assert_eq!(sink.send_count(), 31);
        assert!(sink.records().iter().all(|r| r.hostname == "launcher-host"));
    }

    #[tokio::test]
    async fn test_tracker_waits_for_all_runs() {
        let sink = Arc::new(RecordingSink::new());
        let tracker = TaskTracker::new();
        for _ in 0..3 {
            spawn_generation(
                &tracker,
                context(Settings::default(), sink.clone()),
                GenerationTarget::Count(10),
            );
        }
        tracker.close();
        tracker.wait().await;
        assert_eq!(sink.send_count(), 33);
    }

    #[tokio::test]
    async fn test_delayed_run_starts_after_delay() {
        let sink = Arc::new(RecordingSink::new());
        let tracker = TaskTracker::new();
        let started = Instant::now();
        let report = spawn_delayed_generation(
            &tracker,
            context(Settings::default(), sink.clone()),
            GenerationTarget::Count(5),
            Duration::from_millis(50),
        )
        .await
        .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(report.records, 5);
    }

    #[tokio::test]
    async fn test_bounded_readiness_failure_aborts_run() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let settings = Settings {
            collector: CollectorEndpoint::new("127.0.0.1", port),
            readiness: Some(ReadinessPolicy {
                attempt_timeout: Duration::from_millis(100),
                interval: Duration::from_millis(10),
                max_attempts: Some(2),
            }),
            ..Settings::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let report = run_generation(context(settings, sink.clone()), GenerationTarget::Count(10)).await;

        assert!(matches!(report.outcome, RunOutcome::Failed(_)));
        assert_eq!(report.records, 0);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].log_level, LogLevel::Error);
        assert!(records[0].message.starts_with("Log generation error: Collector"));
        assert!(records[0].message.contains("unreachable after 2 attempts"));
        assert_eq!(records[0].parameters, "count=10");
        assert_eq!(records[0].hostname, "launcher-host");
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_unbounded_readiness_wait() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let settings = Settings {
            collector: CollectorEndpoint::new("127.0.0.1", port),
            readiness: Some(ReadinessPolicy {
                attempt_timeout: Duration::from_millis(50),
                interval: Duration::from_millis(10),
                max_attempts: None,
            }),
            ..Settings::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let ctx = context(settings, sink.clone());
        let shutdown = ctx.shutdown.clone();

        let tracker = TaskTracker::new();
        let handle = spawn_generation(&tracker, ctx, GenerationTarget::Count(10));
        sleep(Duration::from_millis(100)).await;
        shutdown.cancel();

        let report = handle.await.unwrap();
        assert!(matches!(report.outcome, RunOutcome::Failed(ref m) if m.contains("cancelled")));
        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.records()[0].log_level, LogLevel::Error);
    }
}
