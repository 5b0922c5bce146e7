pub mod line_sink;
pub mod system_probe;

pub use line_sink::LineSink;
pub use system_probe::SystemProbe;
