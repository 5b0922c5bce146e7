pub mod sysinfo_probe;
pub mod tcp;

pub use sysinfo_probe::SysinfoProbe;
pub use tcp::TcpLineSink;
