//! # Start Learning Client
//!
//! 学习任务客户端：向后端提交长耗时的学习资料整理任务、轮询进度、
//! 在任务完成时渲染 Markdown 报告，并在等待期间运行一个完全独立的
//! 记忆翻牌小游戏。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/timer` - 重复定时器与一次性延迟任务，句柄可停止
//!
//! ### ② 业务能力层（Services）
//! - `GameEngine` - 记忆翻牌游戏（翻牌/判定/暂停/重开）
//! - `UiHost` - 界面出口（进度、结果、提示、按钮状态）
//! - `SummaryRenderer` - 结果渲染出口（Markdown 渲染由外部协作者完成）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/poll_loop` - 可取消的状态轮询循环与进度映射
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/controller` - 任务生命周期控制器
//!   （提交 → 轮询 → 终态分发 → 清理）
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpLearningClient, LearningBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::job::{JobHandle, JobState, JobStatus};
pub use orchestrator::JobController;
pub use services::game_engine::{format_time, GameEngine};
pub use services::presentation::{PlainSummaryRenderer, SummaryRenderer};
pub use services::ui_host::{ConsoleUi, UiHost};
