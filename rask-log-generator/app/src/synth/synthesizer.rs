use super::message::{self, MessagePolicy};
use super::pools::{APP_NAMES, LOG_LEVELS, METHODS, REQUEST_URLS, SamplingPools, sample};
use crate::domain::{HttpMethod, LogLevel, LogRecord, iso_timestamp};
use fake::Fake;
use fake::faker::lorem::en::Paragraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;

/// `app_name` stamped on records describing the service's own activity.
pub const SERVICE_NAME: &str = "rask-log-generator";

/// Source address of lifecycle records emitted by background runs.
pub const LOCAL_IP: &str = "127.0.0.1";

const MAX_FILLER_FIELDS: usize = 10;
const FILLER_CHARS: std::ops::RangeInclusive<usize> = 20..=200;

/// Produces an endless stream of synthetic records for one generation run.
///
/// Pools are drawn once at construction; every record then samples
/// independently from them and from the fixed literal lists.
pub struct RecordSynthesizer<R = StdRng> {
    hostname: Arc<str>,
    pools: SamplingPools,
    policy: MessagePolicy,
    rng: R,
}

impl RecordSynthesizer<StdRng> {
    /// Seeded synthesizers are reproducible; unseeded ones draw from the OS.
    pub fn from_seed(
        hostname: Arc<str>,
        pool_size: usize,
        policy: MessagePolicy,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(hostname, pool_size, policy, rng)
    }
}

impl<R: Rng> RecordSynthesizer<R> {
    pub fn with_rng(hostname: Arc<str>, pool_size: usize, policy: MessagePolicy, mut rng: R) -> Self {
        let pools = SamplingPools::generate(&mut rng, pool_size);
        Self {
            hostname,
            pools,
            policy,
            rng,
        }
    }

    pub fn pools(&self) -> &SamplingPools {
        &self.pools
    }

    /// Next record without filler fields.
    pub fn next_record(&mut self) -> LogRecord {
        self.synthesize(false)
    }

    /// Next record; with `filler`, 1..=10 `field_{i}` text fields are attached.
    pub fn synthesize(&mut self, filler: bool) -> LogRecord {
        let message = message::render(self.policy, &self.pools, &mut self.rng);
        let filler = if filler {
            self.filler_fields()
        } else {
            BTreeMap::new()
        };

        let rng = &mut self.rng;
        LogRecord {
            timestamp: iso_timestamp(),
            hostname: self.hostname.to_string(),
            server_name: self.hostname.to_string(),
            username: self.pools.username(rng).to_string(),
            app_name: (*sample(rng, APP_NAMES)).to_string(),
            container_id: rng.random_range(1..=100),
            log_level: *sample(rng, LOG_LEVELS),
            message,
            request_url: (*sample(rng, REQUEST_URLS)).to_string(),
            parameters: format!(
                "param{}=value{}",
                rng.random_range(1..=5),
                rng.random_range(1..=100)
            ),
            path: (*sample(rng, REQUEST_URLS)).to_string(),
            method: *sample(rng, METHODS),
            ip: self.pools.ip(rng).to_string(),
            random_number: rng.random_range(1..=10_000),
            filler,
        }
    }

    fn filler_fields(&mut self) -> BTreeMap<String, String> {
        let rng = &mut self.rng;
        let fields = rng.random_range(1..=MAX_FILLER_FIELDS);
        (0..fields)
            .map(|i| {
                let max_chars = rng.random_range(FILLER_CHARS);
                (format!("field_{i}"), filler_text(rng, max_chars))
            })
            .collect()
    }

    /// A record describing the service's own activity, drawn from this run's RNG.
    pub fn lifecycle(&mut self, event: LifecycleEvent<'_>) -> LogRecord {
        event.into_record(&self.hostname, &mut self.rng)
    }
}

/// Lorem paragraph cut to at most `max_chars` characters.
fn filler_text<R: Rng + ?Sized>(rng: &mut R, max_chars: usize) -> String {
    let paragraph: String = Paragraph(1..4).fake_with_rng(rng);
    paragraph.chars().take(max_chars).collect()
}

impl<R: Rng> Iterator for RecordSynthesizer<R> {
    type Item = LogRecord;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_record())
    }
}

/// Describes a request or run milestone to be turned into a `LogRecord`.
#[derive(Debug, Clone)]
pub struct LifecycleEvent<'a> {
    pub level: LogLevel,
    pub username: &'a str,
    pub message: String,
    pub path: &'a str,
    pub parameters: String,
    pub method: HttpMethod,
    pub ip: &'a str,
}

impl<'a> LifecycleEvent<'a> {
    /// An `INFO` event for a `GET` on `path` from `ip`.
    pub fn request(username: &'a str, path: &'a str, ip: &'a str, message: String) -> Self {
        Self {
            level: LogLevel::Info,
            username,
            message,
            path,
            parameters: String::new(),
            method: HttpMethod::Get,
            ip,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_parameters(mut self, parameters: String) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn into_record<R: Rng + ?Sized>(self, hostname: &str, rng: &mut R) -> LogRecord {
        LogRecord {
            timestamp: iso_timestamp(),
            hostname: hostname.to_string(),
            server_name: hostname.to_string(),
            username: self.username.to_string(),
            app_name: SERVICE_NAME.to_string(),
            container_id: 1,
            log_level: self.level,
            message: self.message,
            request_url: self.path.to_string(),
            parameters: self.parameters,
            path: self.path.to_string(),
            method: self.method,
            ip: self.ip.to_string(),
            random_number: rng.random_range(1..=1000),
            filler: BTreeMap::new(),
        }
    }
}
