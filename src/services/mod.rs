//! 业务能力层

pub mod game_engine;
pub mod presentation;
pub mod ui_host;

pub use game_engine::{format_time, GameEngine};
pub use presentation::{PlainSummaryRenderer, SummaryRenderer};
pub use ui_host::{ConsoleUi, UiHost};
