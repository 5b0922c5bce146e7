//! Record Synthesizer: fake structured log records drawn from fixed pools.

pub mod api_entries;
pub mod message;
pub mod pools;
pub mod synthesizer;

pub use api_entries::api_log_entries;
pub use message::MessagePolicy;
pub use pools::SamplingPools;
pub use synthesizer::{LOCAL_IP, LifecycleEvent, RecordSynthesizer, SERVICE_NAME};
