pub mod assign;
pub mod dedup;
pub mod graph;
pub mod labeling;
pub mod orchestrator;
pub mod pipeline;
pub mod relevance;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use pipeline::{Pipeline, RunOptions};
