//! crosspost adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `content`: Filesystem-based markdown content loader
//! - `state`: JSON-file and in-memory publish state stores
//! - `platforms`: HTTP platform adapter and the per-platform profiles

mod content_fs;
mod state_json;
mod state_memory;

pub mod platforms;

/// Re-exports for content adapters
pub mod content {
    pub use crate::content_fs::FsContentRepo;
}

/// Re-exports for state adapters
pub mod state {
    pub use crate::state_json::JsonStateStore;
    pub use crate::state_memory::InMemoryStateStore;
}
