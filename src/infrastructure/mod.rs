//! 基础设施层：调度等底层能力

pub mod timer;

pub use timer::TimerHandle;
