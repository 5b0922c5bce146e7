use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::GenerationTarget;
use crate::error::GeneratorError;
use crate::synth::MessagePolicy;

const DEFAULT_LOGSTASH_HOST: &str = "logstash";
const DEFAULT_LOGSTASH_PORT: u16 = 5000;
const DEFAULT_HTTP_PORT: u16 = 5000;
const DEFAULT_SINK_TIMEOUT_MS: u64 = 1000;
const DEFAULT_POOL_SIZE: usize = 10;
const MAX_POOL_SIZE: usize = 10_000;
const DEFAULT_PROGRESS_EVERY: u64 = 100;
const DEFAULT_THROTTLE_EVERY: u64 = 10;
const DEFAULT_THROTTLE_PAUSE_MS: u64 = 1;
const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;

/// Host and port of the line-oriented log collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorEndpoint {
    pub host: String,
    pub port: u16,
}

impl CollectorEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, as accepted by `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// When the generation loop reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPolicy {
    EveryRecords(u64),
    Interval(Duration),
}

/// How the collector readiness probe retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempt_timeout: Duration,
    pub interval: Duration,
    /// `None` keeps probing until the collector answers.
    pub max_attempts: Option<u32>,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(1),
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// A run launched by the process itself, without an HTTP trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupGeneration {
    pub delay: Duration,
    pub target: GenerationTarget,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub collector: CollectorEndpoint,
    /// HTTP server port
    pub http_port: u16,
    /// Connect and write timeout of every per-record connection
    pub sink_timeout: Duration,
    /// Usernames and IPs drawn per run
    pub pool_size: usize,
    pub message_policy: MessagePolicy,
    /// Attach filler fields during the first half of byte-sized runs
    pub filler_fields: bool,
    pub progress: ProgressPolicy,
    /// Pause after this many records; 0 disables throttling
    pub throttle_every: u64,
    pub throttle_pause: Duration,
    /// Probe the collector before bulk runs when set
    pub readiness: Option<ReadinessPolicy>,
    pub seed: Option<u64>,
    pub startup: Option<StartupGeneration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collector: CollectorEndpoint::new(DEFAULT_LOGSTASH_HOST, DEFAULT_LOGSTASH_PORT),
            http_port: DEFAULT_HTTP_PORT,
            sink_timeout: Duration::from_millis(DEFAULT_SINK_TIMEOUT_MS),
            pool_size: DEFAULT_POOL_SIZE,
            message_policy: MessagePolicy::Template,
            filler_fields: true,
            progress: ProgressPolicy::EveryRecords(DEFAULT_PROGRESS_EVERY),
            throttle_every: DEFAULT_THROTTLE_EVERY,
            throttle_pause: Duration::from_millis(DEFAULT_THROTTLE_PAUSE_MS),
            readiness: None,
            seed: None,
            startup: None,
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        validate_host(&self.collector.host)?;
        validate_port(self.collector.port)?;
        validate_port(self.http_port)?;
        if self.sink_timeout.is_zero() {
            return Err(GeneratorError::Config("Sink timeout cannot be 0".into()));
        }
        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(GeneratorError::Config(format!(
                "Sampling pool size must be between 1 and {MAX_POOL_SIZE}"
            )));
        }
        match self.progress {
            ProgressPolicy::EveryRecords(0) => {
                return Err(GeneratorError::Config(
                    "Progress period cannot be 0 records".into(),
                ));
            }
            ProgressPolicy::Interval(interval) if interval.is_zero() => {
                return Err(GeneratorError::Config(
                    "Progress interval cannot be 0 seconds".into(),
                ));
            }
            _ => {}
        }
        if let Some(readiness) = &self.readiness {
            if readiness.max_attempts == Some(0) {
                return Err(GeneratorError::Config(
                    "Readiness max attempts cannot be 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Build settings from an arbitrary variable lookup, applying defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GeneratorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let host = lookup("LOGSTASH_HOST").unwrap_or(defaults.collector.host);
        let port = parse_or(&lookup, "LOGSTASH_PORT", defaults.collector.port)?;
        let http_port = parse_or(&lookup, "HTTP_PORT", defaults.http_port)?;
        let sink_timeout_ms = parse_or(&lookup, "SINK_TIMEOUT_MS", DEFAULT_SINK_TIMEOUT_MS)?;
        let pool_size = parse_or(&lookup, "SAMPLING_POOL_SIZE", defaults.pool_size)?;
        let message_policy = parse_or(&lookup, "MESSAGE_POLICY", defaults.message_policy)?;
        let filler_fields = parse_bool_or(&lookup, "FILLER_FIELDS", defaults.filler_fields)?;

        let progress = match parse_opt::<u64, _>(&lookup, "PROGRESS_INTERVAL_SECS")? {
            Some(secs) => ProgressPolicy::Interval(Duration::from_secs(secs)),
            None => ProgressPolicy::EveryRecords(parse_or(
                &lookup,
                "PROGRESS_EVERY",
                DEFAULT_PROGRESS_EVERY,
            )?),
        };

        let throttle_every = parse_or(&lookup, "THROTTLE_EVERY", defaults.throttle_every)?;
        let throttle_pause_ms =
            parse_or(&lookup, "THROTTLE_PAUSE_MS", DEFAULT_THROTTLE_PAUSE_MS)?;

        let readiness = if parse_bool_or(&lookup, "WAIT_FOR_COLLECTOR", false)? {
            Some(ReadinessPolicy {
                max_attempts: parse_opt(&lookup, "READINESS_MAX_ATTEMPTS")?,
                ..ReadinessPolicy::default()
            })
        } else {
            None
        };

        let seed = parse_opt(&lookup, "GENERATION_SEED")?;
        let startup = startup_generation(&lookup)?;

        let settings = Settings {
            collector: CollectorEndpoint::new(host, port),
            http_port,
            sink_timeout: Duration::from_millis(sink_timeout_ms),
            pool_size,
            message_policy,
            filler_fields,
            progress,
            throttle_every,
            throttle_pause: Duration::from_millis(throttle_pause_ms),
            readiness,
            seed,
            startup,
        };

        // Validate settings before returning
        settings.validate()?;

        Ok(settings)
    }
}

fn startup_generation<F>(lookup: &F) -> Result<Option<StartupGeneration>, GeneratorError>
where
    F: Fn(&str) -> Option<String>,
{
    let target = if let Some(count) = parse_opt::<u64, _>(lookup, "STARTUP_GENERATION_COUNT")? {
        GenerationTarget::count(count)
    } else if let Some(size_gb) = parse_opt::<f64, _>(lookup, "STARTUP_GENERATION_GB")? {
        GenerationTarget::gigabytes(size_gb)
            .map_err(|e| GeneratorError::Config(format!("STARTUP_GENERATION_GB: {e}")))?
    } else {
        return Ok(None);
    };

    let delay_secs = parse_or(lookup, "STARTUP_DELAY_SECS", DEFAULT_STARTUP_DELAY_SECS)?;
    Ok(Some(StartupGeneration {
        delay: Duration::from_secs(delay_secs),
        target,
    }))
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), GeneratorError> {
    if host.trim().is_empty() {
        return Err(GeneratorError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), GeneratorError> {
    if port == 0 {
        return Err(GeneratorError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn parse_opt<T, F>(lookup: &F, name: &str) -> Result<Option<T>, GeneratorError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GeneratorError::Config(format!("Invalid {name}='{raw}': {e}"))),
        _ => Ok(None),
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> Result<T, GeneratorError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(lookup, name)?.unwrap_or(default))
}

fn parse_bool_or<F>(lookup: &F, name: &str, default: bool) -> Result<bool, GeneratorError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(GeneratorError::Config(format!(
                "Invalid {name}='{raw}': expected a boolean"
            ))),
        },
        None => Ok(default),
    }
}

pub fn get_configuration() -> Result<Settings, GeneratorError> {
    Settings::from_lookup(|name| env::var(name).ok())
}
