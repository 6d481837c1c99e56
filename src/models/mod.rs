//! 数据模型

pub mod game;
pub mod job;

pub use game::{GameCard, GameSummary, CARD_COUNT, GAME_SYMBOLS, PAIR_COUNT};
pub use job::{JobHandle, JobState, JobStatus};
