//! Application use cases

pub mod publish;

pub use publish::{PublishRun, PublishRunConfig, RunError};
