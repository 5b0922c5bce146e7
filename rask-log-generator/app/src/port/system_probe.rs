use crate::domain::SystemMetrics;
use crate::error::GeneratorError;
use std::future::Future;
use std::pin::Pin;

/// Source of host utilization figures for `/api/system`.
pub trait SystemProbe: Send + Sync {
    fn snapshot(&self) -> Pin<Box<dyn Future<Output = Result<SystemMetrics, GeneratorError>> + Send + '_>>;
}
