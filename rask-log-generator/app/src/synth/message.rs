use super::pools::{API_RESOURCES, REQUEST_URLS, SamplingPools, sample};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the `message` field of a generated record is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    /// Fill one of the message templates with freshly sampled values.
    #[default]
    Template,
    /// Pick a whole message verbatim from a fixed list.
    Canned,
}

impl FromStr for MessagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(MessagePolicy::Template),
            "canned" => Ok(MessagePolicy::Canned),
            other => Err(format!(
                "unknown message policy '{other}' (expected 'template' or 'canned')"
            )),
        }
    }
}

pub const TEMPLATES: &[&str] = &[
    "User {username} accessed {page} page",
    "API request to {endpoint} completed in {time}ms",
    "Database query executed in {time}ms with result count: {count}",
];

pub const CANNED_MESSAGES: &[&str] = &[
    "User logged in successfully",
    "User logged out",
    "Password reset requested",
    "Session expired, redirecting to login",
    "Cache miss for product catalog, reloading",
    "Payment processed successfully",
    "Payment gateway timeout, retrying",
    "Order created and queued for fulfillment",
    "Inventory level below threshold",
    "Database connection pool exhausted",
    "Slow query detected on orders table",
    "Configuration reloaded",
    "Health check passed",
    "Rate limit exceeded for client",
    "Unexpected null value in request payload",
];

/// Produce one message according to `policy`.
pub fn render<R: Rng + ?Sized>(policy: MessagePolicy, pools: &SamplingPools, rng: &mut R) -> String {
    match policy {
        MessagePolicy::Template => fill_template(*sample(rng, TEMPLATES), pools, rng),
        MessagePolicy::Canned => (*sample(rng, CANNED_MESSAGES)).to_string(),
    }
}

/// Substitute `{username}`, `{page}`, `{endpoint}`, `{time}` and `{count}`.
///
/// Every placeholder gets an independent sample, whether or not the template
/// uses it, so that the RNG advances identically for every template.
pub fn fill_template<R: Rng + ?Sized>(template: &str, pools: &SamplingPools, rng: &mut R) -> String {
    let username = pools.username(rng).to_string();
    let page = *sample(rng, REQUEST_URLS);
    let endpoint = format!(
        "/api/{}/{}",
        sample(rng, API_RESOURCES),
        rng.random_range(1..=9999)
    );
    let time = rng.random_range(1..=5000).to_string();
    let count = rng.random_range(0..=1000).to_string();

    template
        .replace("{username}", &username)
        .replace("{page}", page)
        .replace("{endpoint}", &endpoint)
        .replace("{time}", &time)
        .replace("{count}", &count)
}
