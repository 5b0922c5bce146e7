pub mod readiness;
pub mod sink;

pub use readiness::wait_until_reachable;
pub use sink::{SinkError, TcpLineSink};
