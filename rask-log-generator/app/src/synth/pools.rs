use crate::domain::{HttpMethod, LogLevel};
use fake::Fake;
use fake::faker::internet::en::{IPv4, Username};
use rand::Rng;

pub const APP_NAMES: &[&str] = &["app1", "app2", "app3"];
pub const REQUEST_URLS: &[&str] = &["/home", "/about", "/contact", "/faq", "/services"];
pub const API_RESOURCES: &[&str] = &["users", "products", "orders"];
pub const LOG_LEVELS: &[LogLevel] = &LogLevel::ALL;
pub const METHODS: &[HttpMethod] = &HttpMethod::ALL;

/// Per-run sampling pools of fake usernames and IPv4 addresses.
#[derive(Debug, Clone)]
pub struct SamplingPools {
    pub usernames: Vec<String>,
    pub ips: Vec<String>,
}

impl SamplingPools {
    /// Build `size` usernames and `size` IPs. A size of 0 is bumped to 1 so
    /// that sampling never sees an empty pool.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Self {
        let size = size.max(1);
        let usernames = (0..size)
            .map(|_| Username().fake_with_rng::<String, _>(rng))
            .collect();
        let ips = (0..size)
            .map(|_| IPv4().fake_with_rng::<String, _>(rng))
            .collect();
        Self { usernames, ips }
    }

    pub fn username<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        sample(rng, &self.usernames).as_str()
    }

    pub fn ip<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        sample(rng, &self.ips).as_str()
    }
}

/// Uniform draw with replacement. `items` must not be empty.
pub fn sample<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}
