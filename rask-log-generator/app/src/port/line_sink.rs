use crate::domain::LogRecord;
use std::future::Future;
use std::pin::Pin;

/// Destination for synthetic records (TCP collector, test double, ...).
///
/// Delivery is best-effort: implementations swallow and log their own
/// failures, so callers never learn whether a record arrived.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
pub trait LineSink: Send + Sync {
    fn send<'a>(&'a self, record: &'a LogRecord) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}
