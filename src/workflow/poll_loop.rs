//! 任务状态轮询 - 流程层
//!
//! 可取消的异步轮询循环：提交成功后立即查一次状态，此后按固定间隔
//! 重复，直到观察到终态或轮询本身出错。取消标志在每次请求前后都会
//! 检查，迟到的响应（任务已被放弃后才返回）在取效前被丢弃。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clients::LearningBackend;
use crate::error::AppError;
use crate::models::job::{JobHandle, JobState, JobStatus};

/// 轮询上下文：任务句柄 + 取消标志
#[derive(Clone)]
pub struct PollCtx {
    pub handle: JobHandle,
    cancelled: Arc<AtomicBool>,
}

impl PollCtx {
    pub fn new(handle: JobHandle) -> Self {
        Self {
            handle,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 标记取消；已在途的请求结果将被丢弃
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// 轮询终态
#[derive(Debug)]
pub enum PollOutcome {
    /// 任务完成，携带最后一次快照（含总结）
    Completed(JobState),
    /// 任务失败或轮询出错
    Failed(AppError),
    /// 任务被放弃，不产生任何界面变化
    Cancelled,
}

/// 状态到展示进度的映射（纯函数，只影响显示，不影响控制流）
pub fn map_progress(state: &JobState) -> (u8, String) {
    match state.status {
        JobStatus::Starting => (20, "正在准备学习之旅...".to_string()),
        JobStatus::Running => (
            60,
            state
                .progress
                .clone()
                .unwrap_or_else(|| "处理中...".to_string()),
        ),
        JobStatus::Completed => (100, "完成！正在整理结果...".to_string()),
        JobStatus::Failed | JobStatus::Unknown => (40, "处理中...".to_string()),
    }
}

/// 轮询直到终态
///
/// 每轮的失败都在这里被捕获并转成终态返回，绝不跨任务边界抛出，
/// 保证循环一定会停。
pub async fn poll_until_terminal<B, F>(
    client: &B,
    ctx: &PollCtx,
    interval_ms: u64,
    mut on_progress: F,
) -> PollOutcome
where
    B: LearningBackend,
    F: FnMut(u8, &str),
{
    loop {
        if ctx.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        match client.job_status(&ctx.handle).await {
            Ok(state) => {
                // 响应落地前再查一次取消标志：任务可能在请求途中被放弃
                if ctx.is_cancelled() {
                    debug!("忽略已放弃任务的状态响应: job_id={}", ctx.handle);
                    return PollOutcome::Cancelled;
                }
                match state.status {
                    JobStatus::Completed => {
                        info!("✓ 任务 {} 已完成", ctx.handle);
                        return PollOutcome::Completed(state);
                    }
                    JobStatus::Failed => {
                        return PollOutcome::Failed(AppError::job_failed(state.error.clone()));
                    }
                    _ => {
                        let (percent, label) = map_progress(&state);
                        on_progress(percent, &label);
                    }
                }
            }
            Err(err) => {
                if ctx.is_cancelled() {
                    return PollOutcome::Cancelled;
                }
                return PollOutcome::Failed(err);
            }
        }

        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
    }
}
