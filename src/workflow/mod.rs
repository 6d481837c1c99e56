//! 流程层

pub mod poll_loop;

pub use poll_loop::{map_progress, PollCtx, PollOutcome};
