//! Generation Loop: repeated synthesize-and-send cycles until a target is met.

pub mod launcher;
pub mod run;

pub use launcher::{GenerationContext, run_generation, spawn_delayed_generation, spawn_generation};
pub use run::{GenerationLoop, LoopOptions};
