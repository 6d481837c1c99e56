//! 任务生命周期控制器 - 编排层
//!
//! 状态机：Idle → Submitting → Polling → {Completed | Failed} → Idle。
//! 控制器独占持有当前任务句柄与轮询任务；游戏引擎只被启动/停止，
//! 内部状态从不被窥探。四类错误（校验、创建、轮询、任务失败）在
//! UI 边界统一处理：停轮询、显示可自动消失的提示、恢复提交入口、
//! 停掉等待游戏。任何错误都不自动重试，新的提交完全由用户发起。

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clients::LearningBackend;
use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::timer::{self, TimerHandle};
use crate::models::job::{JobHandle, JobState};
use crate::services::game_engine::GameEngine;
use crate::services::presentation::SummaryRenderer;
use crate::services::ui_host::UiHost;
use crate::utils::logging::truncate_text;
use crate::workflow::poll_loop::{self, PollCtx, PollOutcome};

/// 当前活动任务
struct ActiveJob {
    ctx: PollCtx,
    task: Option<JoinHandle<()>>,
}

struct Shared<B> {
    config: Config,
    client: B,
    ui: Arc<dyn UiHost>,
    renderer: Arc<dyn SummaryRenderer>,
    game: GameEngine,
    active: Mutex<Option<ActiveJob>>,
    /// 终态后的一次性界面定时任务（淡出、提示过期、游戏缓冲隐藏）
    ui_timers: Mutex<Vec<TimerHandle>>,
}

/// 任务生命周期控制器
pub struct JobController<B: LearningBackend> {
    shared: Arc<Shared<B>>,
}

impl<B: LearningBackend> JobController<B> {
    pub fn new(
        config: Config,
        client: B,
        ui: Arc<dyn UiHost>,
        renderer: Arc<dyn SummaryRenderer>,
    ) -> Self {
        let game = GameEngine::new(&config);
        Self {
            shared: Arc::new(Shared {
                config,
                client,
                ui,
                renderer,
                game,
                active: Mutex::new(None),
                ui_timers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// 等待游戏引擎（翻牌、暂停等操作由界面直接调用）
    pub fn game(&self) -> &GameEngine {
        &self.shared.game
    }

    /// 当前活动任务的句柄
    pub fn active_handle(&self) -> Option<JobHandle> {
        lock(&self.shared.active)
            .as_ref()
            .map(|job| job.ctx.handle.clone())
    }

    /// 提交学习任务
    ///
    /// 主题或级别为空时直接拒绝，不发起任何网络请求。提交成功后
    /// 开始轮询；等待游戏与任务结果无关，提交即启动。
    pub async fn submit(&self, topic: &str, level: &str) -> AppResult<JobHandle> {
        let s = &self.shared;

        let topic = topic.trim();
        if topic.is_empty() {
            let err = AppError::Validation(ValidationError::EmptyTopic);
            s.fail_current(&err);
            return Err(err);
        }
        if level.trim().is_empty() {
            let err = AppError::Validation(ValidationError::EmptyLevel);
            s.fail_current(&err);
            return Err(err);
        }
        if lock(&s.active).is_some() {
            // 界面会在 Submitting/Polling 期间禁用提交，这里只兜底
            warn!("⚠️ 已有任务在进行中，忽略本次提交");
            return Err(AppError::Other("已有任务在进行中".to_string()));
        }

        info!("📚 开始学习任务: 主题={}, 级别={}", topic, level);

        // 进入 Submitting：锁提交、亮进度、开游戏
        s.ui.set_submit_enabled(false);
        s.ui.set_results_visible(false);
        s.ui.set_progress_visible(true);
        s.ui.set_progress(10, "正在开启学习之旅...");
        s.ui.set_game_visible(true);
        s.game.start();

        match s.client.start_learning(topic, level).await {
            Ok(handle) => {
                info!("✓ 任务已创建: job_id={}", handle);
                let ctx = PollCtx::new(handle.clone());
                let task = self.spawn_poll_task(ctx.clone());
                *lock(&s.active) = Some(ActiveJob {
                    ctx,
                    task: Some(task),
                });
                Ok(handle)
            }
            Err(err) => {
                s.fail_current(&err);
                Err(err)
            }
        }
    }

    /// 放弃当前任务
    ///
    /// 轮询任务看到取消标志后自行退出；已在途的状态响应会因句柄
    /// 不再匹配而被丢弃。
    pub fn cancel(&self) {
        let job = lock(&self.shared.active).take();
        if let Some(job) = job {
            info!("🛑 放弃学习任务: job_id={}", job.ctx.handle);
            job.ctx.cancel();
            self.shared.game.stop();
            self.shared.ui.set_game_visible(false);
            self.shared.ui.set_progress_visible(false);
            self.shared.ui.set_submit_enabled(true);
        }
    }

    /// 等待当前任务的轮询结束（供命令行入口使用）
    pub async fn wait(&self) {
        let task = lock(&self.shared.active)
            .as_mut()
            .and_then(|job| job.task.take());
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    fn spawn_poll_task(&self, ctx: PollCtx) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let ui = Arc::clone(&shared.ui);
            let outcome = poll_loop::poll_until_terminal(
                &shared.client,
                &ctx,
                shared.config.poll_interval_ms,
                |percent, label| ui.set_progress(percent, label),
            )
            .await;

            match outcome {
                PollOutcome::Completed(state) => shared.apply_completion(&ctx, state),
                PollOutcome::Failed(err) => shared.apply_failure(&ctx, &err),
                PollOutcome::Cancelled => {
                    debug!("轮询任务退出（已取消）: job_id={}", ctx.handle)
                }
            }
        })
    }
}

impl<B: LearningBackend> Shared<B> {
    /// 过期校验：只有仍是当前任务且未取消的结果才允许落地
    fn is_current(&self, ctx: &PollCtx) -> bool {
        if ctx.is_cancelled() {
            return false;
        }
        lock(&self.active)
            .as_ref()
            .map(|job| job.ctx.handle == ctx.handle)
            .unwrap_or(false)
    }

    fn clear_active(&self) {
        lock(&self.active).take();
    }

    /// 完成转移：渲染总结、亮下载入口、恢复提交、缓冲隐藏游戏
    fn apply_completion(&self, ctx: &PollCtx, state: JobState) {
        if !self.is_current(ctx) {
            debug!("忽略过期的完成通知: job_id={}", ctx.handle);
            return;
        }
        self.clear_active();

        info!("🎉 学习任务完成: job_id={}", ctx.handle);
        self.ui.set_progress(100, "完成！正在整理结果...");

        match state.summary.as_deref() {
            Some(summary) => {
                // 详细日志（如果启用）
                if self.config.verbose_logging {
                    info!("📝 总结原文: {}", truncate_text(summary, 500));
                }
                let html = self.renderer.render(summary);
                let download_url = self.client.download_report_url(&ctx.handle);
                self.ui.set_results(&html, &download_url);
                self.ui.set_results_visible(true);
            }
            None => warn!("⚠️ 任务完成但未返回总结内容"),
        }

        self.restore_submit();
        self.hide_game_after_grace();
    }

    /// 失败转移：轮询出错或服务端报告失败
    fn apply_failure(&self, ctx: &PollCtx, err: &AppError) {
        if !self.is_current(ctx) {
            debug!("忽略过期的失败通知: job_id={}", ctx.handle);
            return;
        }
        self.clear_active();
        self.fail_current(err);
    }

    /// 统一的错误出口：四类错误在 UI 边界的处理完全一致
    fn fail_current(&self, err: &AppError) {
        error!("❌ 学习任务失败: {}", err);
        self.show_error_with_expiry(&err.user_message());
        self.restore_submit();
        self.hide_game_after_grace();
    }

    /// 恢复提交入口；进度区域延迟淡出
    fn restore_submit(&self) {
        self.ui.set_submit_enabled(true);
        let ui = Arc::clone(&self.ui);
        let handle = timer::start_once(self.config.progress_fade_ms, move || {
            ui.set_progress_visible(false);
        });
        self.push_ui_timer(handle);
    }

    /// 缓冲一段时间再隐藏并停止游戏，避免界面突兀切换
    fn hide_game_after_grace(&self) {
        let ui = Arc::clone(&self.ui);
        let game = self.game.clone();
        let handle = timer::start_once(self.config.game_hide_grace_ms, move || {
            ui.set_game_visible(false);
            game.stop();
        });
        self.push_ui_timer(handle);
    }

    /// 显示错误提示，到期自动清除
    fn show_error_with_expiry(&self, message: &str) {
        self.ui.show_error(message);
        let ui = Arc::clone(&self.ui);
        let handle = timer::start_once(self.config.error_display_ms, move || {
            ui.clear_messages();
        });
        self.push_ui_timer(handle);
    }

    fn push_ui_timer(&self, handle: TimerHandle) {
        let mut timers = lock(&self.ui_timers);
        timers.retain(|t| t.is_active());
        timers.push(handle);
    }
}

/// 锁辅助：即便持锁线程 panic 也继续使用内部数据
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
