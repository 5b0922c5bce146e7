use crate::config::{ProgressPolicy, Settings};
use crate::domain::{GenerationReport, GenerationTarget, LogLevel, RunOutcome};
use crate::error::GeneratorError;
use crate::port::LineSink;
use crate::synth::{LOCAL_IP, LifecycleEvent, RecordSynthesizer};
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Knobs of the synthesize-and-send loop that do not affect record content.
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub progress: ProgressPolicy,
    /// Pause after this many records; 0 disables throttling
    pub throttle_every: u64,
    pub throttle_pause: Duration,
    pub filler_fields: bool,
}

impl LoopOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            progress: settings.progress,
            throttle_every: settings.throttle_every,
            throttle_pause: settings.throttle_pause,
            filler_fields: settings.filler_fields,
        }
    }
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Drives Synthesizer -> Sink until a target is met.
pub struct GenerationLoop<R = StdRng> {
    synthesizer: RecordSynthesizer<R>,
    sink: Arc<dyn LineSink>,
    options: LoopOptions,
    cancel: CancellationToken,
}

struct Totals {
    records: u64,
    bytes: u64,
}

impl<R: Rng + Send> GenerationLoop<R> {
    pub fn new(synthesizer: RecordSynthesizer<R>, sink: Arc<dyn LineSink>, options: LoopOptions) -> Self {
        Self {
            synthesizer,
            sink,
            options,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop early, as a failed run, once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run until `target` is met, then send a summary record.
    ///
    /// A failing run logs at error level, sends one error record and stops.
    /// A target that is already met sends nothing at all.
    pub async fn run(mut self, target: GenerationTarget) -> GenerationReport {
        let started = Instant::now();

        if target.is_reached(0, 0) {
            info!("Log generation target {target} is empty, nothing to generate");
            return GenerationReport {
                records: 0,
                bytes: 0,
                elapsed: started.elapsed(),
                outcome: RunOutcome::Completed,
            };
        }

        info!("Starting log generation for {target} of logs");
        let mut totals = Totals {
            records: 0,
            bytes: 0,
        };

        let outcome = match self.drive(target, &mut totals, started).await {
            Ok(()) => RunOutcome::Completed,
            Err(e) => RunOutcome::Failed(e.to_string()),
        };

        let report = GenerationReport {
            records: totals.records,
            bytes: totals.bytes,
            elapsed: started.elapsed(),
            outcome,
        };
        self.finish(target, &report).await;
        report
    }

    async fn drive(
        &mut self,
        target: GenerationTarget,
        totals: &mut Totals,
        started: Instant,
    ) -> Result<(), GeneratorError> {
        let mut last_report = started;

        while !target.is_reached(totals.records, totals.bytes) {
            if self.cancel.is_cancelled() {
                return Err(GeneratorError::Cancelled);
            }
            let filler = self.options.filler_fields && target.wants_filler(totals.bytes);
            let record = self.synthesizer.synthesize(filler);
            let size = record.encoded_len()?;

            self.sink.send(&record).await;

            totals.records += 1;
            totals.bytes += size;

            if self.progress_due(totals.records, &mut last_report) {
                log_progress(target, totals, started.elapsed());
            }

            if self.options.throttle_every > 0 && totals.records % self.options.throttle_every == 0 {
                sleep(self.options.throttle_pause).await;
            }
        }
        Ok(())
    }

    fn progress_due(&self, records: u64, last_report: &mut Instant) -> bool {
        match self.options.progress {
            ProgressPolicy::EveryRecords(every) => every > 0 && records % every == 0,
            ProgressPolicy::Interval(interval) => {
                if last_report.elapsed() >= interval {
                    *last_report = Instant::now();
                    true
                } else {
                    false
                }
            }
        }
    }

    async fn finish(&mut self, target: GenerationTarget, report: &GenerationReport) {
        match &report.outcome {
            RunOutcome::Completed => info!(
                "Log generation completed: {} logs ({:.2}MB) in {:.2} seconds ({:.1} logs/s)",
                report.records,
                report.megabytes(),
                report.elapsed.as_secs_f64(),
                report.records_per_second()
            ),
            RunOutcome::Failed(reason) => error!("Error during log generation: {reason}"),
        }

        let record = self.synthesizer.lifecycle(closing_event(target, report));
        self.sink.send(&record).await;
    }
}

/// The summary or error record that ends a run.
pub fn closing_event(target: GenerationTarget, report: &GenerationReport) -> LifecycleEvent<'static> {
    let (level, message) = match &report.outcome {
        RunOutcome::Completed => (
            LogLevel::Info,
            format!(
                "Log generation summary: {} logs ({:.2}MB) in {:.2} seconds",
                report.records,
                report.megabytes(),
                report.elapsed.as_secs_f64()
            ),
        ),
        RunOutcome::Failed(reason) => (LogLevel::Error, format!("Log generation error: {reason}")),
    };
    LifecycleEvent::request("system", "/generate", LOCAL_IP, message)
        .with_level(level)
        .with_parameters(target.as_parameters())
}

fn log_progress(target: GenerationTarget, totals: &Totals, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        totals.records as f64 / secs
    } else {
        0.0
    };
    info!(
        "Generated {} logs ({:.2}MB / {:.1}%) in {:.1}s ({:.1} logs/s)",
        totals.records,
        totals.bytes as f64 / crate::domain::target::BYTES_PER_MB as f64,
        target.progress_percent(totals.records, totals.bytes),
        secs,
        rate
    );
}

/// Report of a run that never reached the loop.
pub fn failed_before_start(reason: &GeneratorError, elapsed: Duration) -> GenerationReport {
    GenerationReport {
        records: 0,
        bytes: 0,
        elapsed,
        outcome: RunOutcome::Failed(reason.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TcpLineSink;
    use crate::config::CollectorEndpoint;
    use crate::domain::LogRecord;
    use crate::synth::{MessagePolicy, SERVICE_NAME};
    use crate::test_support::RecordingSink;
    use std::future::Future;
    use std::pin::Pin;

    /// Records like `RecordingSink`, and cancels `token` after `after` sends.
    struct CancellingSink {
        inner: RecordingSink,
        token: CancellationToken,
        after: usize,
    }

    impl LineSink for CancellingSink {
        fn send<'a>(&'a self, record: &'a LogRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
            Box::pin(async move {
                self.inner.send(record).await;
                if self.inner.send_count() == self.after {
                    self.token.cancel();
                }
            })
        }
    }

    fn options() -> LoopOptions {
        LoopOptions {
            progress: ProgressPolicy::EveryRecords(100),
            throttle_every: 0,
            throttle_pause: Duration::ZERO,
            filler_fields: true,
        }
    }

    fn generation_loop(sink: Arc<RecordingSink>, seed: u64) -> GenerationLoop {
        let synthesizer =
            RecordSynthesizer::from_seed(Arc::from("gen-host"), 10, MessagePolicy::Template, Some(seed));
        GenerationLoop::new(synthesizer, sink, options())
    }

    #[tokio::test]
    async fn test_count_target_sends_exact_number_plus_summary() {
        let sink = Arc::new(RecordingSink::new());
        let report = generation_loop(sink.clone(), 1)
            .run(GenerationTarget::Count(250))
            .await;

        assert!(report.is_completed());
        assert_eq!(report.records, 250);

        let records = sink.records();
        assert_eq!(records.len(), 251);
        assert!(records[..250].iter().all(|r| r.app_name != SERVICE_NAME));
        let summary = records.last().unwrap();
        assert_eq!(summary.app_name, SERVICE_NAME);
        assert_eq!(summary.log_level, LogLevel::Info);
        assert!(summary.message.starts_with("Log generation summary: 250 logs"));
        assert_eq!(summary.parameters, "count=250");
    }

    #[tokio::test]
    async fn test_byte_target_stops_once_threshold_met() {
        let sink = Arc::new(RecordingSink::new());
        let limit = 64 * 1024;
        let report = generation_loop(sink.clone(), 2)
            .run(GenerationTarget::Bytes(limit))
            .await;

        assert!(report.bytes >= limit);
        let generated = &sink.records()[..report.records as usize];
        let sizes: Vec<u64> = generated.iter().map(|r| r.encoded_len().unwrap()).collect();
        assert_eq!(sizes.iter().sum::<u64>(), report.bytes);
        // one record fewer would have stayed below the threshold
        assert!(report.bytes - sizes.last().unwrap() < limit);
    }

    #[tokio::test]
    async fn test_filler_only_in_first_half_of_byte_run() {
        let sink = Arc::new(RecordingSink::new());
        let limit = 32 * 1024;
        let report = generation_loop(sink.clone(), 3)
            .run(GenerationTarget::Bytes(limit))
            .await;

        let mut written = 0u64;
        for record in &sink.records()[..report.records as usize] {
            assert_eq!(!record.filler.is_empty(), written * 2 < limit);
            written += record.encoded_len().unwrap();
        }
    }

    #[tokio::test]
    async fn test_zero_target_emits_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let report = generation_loop(sink.clone(), 4)
            .run(GenerationTarget::Count(0))
            .await;
        assert_eq!(report.records, 0);
        assert!(report.is_completed());
        assert_eq!(sink.send_count(), 0);

        let report = generation_loop(sink.clone(), 4)
            .run(GenerationTarget::Bytes(0))
            .await;
        assert_eq!(report.records, 0);
        assert_eq!(sink.send_count(), 0);
    }

    #[tokio::test]
    async fn test_same_seed_same_record_count_in_byte_mode() {
        let first = generation_loop(Arc::new(RecordingSink::new()), 77)
            .run(GenerationTarget::Bytes(48 * 1024))
            .await;
        let second = generation_loop(Arc::new(RecordingSink::new()), 77)
            .run(GenerationTarget::Bytes(48 * 1024))
            .await;
        assert_eq!(first.records, second.records);
        assert_eq!(first.bytes, second.bytes);
    }

    #[tokio::test]
    async fn test_interval_progress_does_not_change_totals() {
        let sink = Arc::new(RecordingSink::new());
        let synthesizer =
            RecordSynthesizer::from_seed(Arc::from("gen-host"), 10, MessagePolicy::Canned, Some(5));
        let options = LoopOptions {
            progress: ProgressPolicy::Interval(Duration::from_millis(1)),
            throttle_every: 10,
            throttle_pause: Duration::from_millis(1),
            filler_fields: false,
        };
        let report = GenerationLoop::new(synthesizer, sink.clone(), options)
            .run(GenerationTarget::Count(40))
            .await;
        assert_eq!(report.records, 40);
        assert_eq!(sink.send_count(), 41);
    }

    #[test]
    fn test_failed_before_start_report() {
        let err = GeneratorError::CollectorUnreachable {
            address: "logstash:5000".to_string(),
            attempts: 3,
        };
        let report = failed_before_start(&err, Duration::ZERO);
        assert_eq!(report.records, 0);
        assert!(matches!(report.outcome, RunOutcome::Failed(ref m) if m.contains("3 attempts")));
    }

    #[tokio::test]
    async fn test_cancelled_run_sends_error_record_and_stops() {
        let token = CancellationToken::new();
        let sink = Arc::new(CancellingSink {
            inner: RecordingSink::new(),
            token: token.clone(),
            after: 25,
        });
        let synthesizer =
            RecordSynthesizer::from_seed(Arc::from("gen-host"), 10, MessagePolicy::Template, Some(6));
        let report = GenerationLoop::new(synthesizer, sink.clone(), options())
            .with_cancellation(token)
            .run(GenerationTarget::Count(1_000))
            .await;

        assert!(matches!(report.outcome, RunOutcome::Failed(_)));
        assert_eq!(report.records, 25);

        let records = sink.inner.records();
        assert_eq!(records.len(), 26);
        let errors: Vec<&LogRecord> = records
            .iter()
            .filter(|r| r.log_level == LogLevel::Error && r.app_name == SERVICE_NAME)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Log generation error:"));
        assert!(errors[0].message.contains("cancelled"));
        assert_eq!(errors[0].parameters, "count=1000");
        assert!(!records.iter().any(|r| r.message.starts_with("Log generation summary")));
    }

    #[tokio::test]
    async fn test_pre_cancelled_run_only_sends_error_record() {
        let token = CancellationToken::new();
        token.cancel();
        let sink = Arc::new(RecordingSink::new());
        let report = generation_loop(sink.clone(), 8)
            .with_cancellation(token)
            .run(GenerationTarget::Bytes(1024))
            .await;

        assert_eq!(report.records, 0);
        assert!(!report.is_completed());
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].log_level, LogLevel::Error);
        assert!(records[0].message.starts_with("Log generation error:"));
    }

    #[tokio::test]
    async fn test_unreachable_collector_run_still_completes() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sink = Arc::new(TcpLineSink::new(
            CollectorEndpoint::new("127.0.0.1", port),
            Duration::from_millis(100),
        ));
        let synthesizer =
            RecordSynthesizer::from_seed(Arc::from("gen-host"), 10, MessagePolicy::Template, Some(9));

        let started = Instant::now();
        let report = GenerationLoop::new(synthesizer, sink, options())
            .run(GenerationTarget::Count(20))
            .await;

        assert!(report.is_completed());
        assert_eq!(report.records, 20);
        // 21 sends, each bounded by the connect timeout
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
