//! Utility modules for DOM access, timers and display formatting.

pub mod dom;
pub mod format;
pub mod timer;

pub use format::{format_score, rank_badge};
pub use timer::{Scheduler, TimeoutScheduler};
