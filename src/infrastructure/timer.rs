//! 定时任务 - 基础设施层
//!
//! 提供两种调度能力：
//! - `start_repeating`: 固定间隔重复回调（轮询节奏、游戏时钟）
//! - `start_once`: 一次性延迟回调（判定窗口、盖牌延迟、淡出等）
//!
//! 每个逻辑用途同一时刻只应持有一个活动句柄，启动新任务前先停掉旧的。

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// 定时器句柄
///
/// `stop()` 幂等，对已停止的句柄调用是安全的；句柄被 Drop 时自动停止。
/// 停止后已排期但尚未触发的回调不会再执行。
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 启动重复定时器
///
/// 首次回调发生在一个完整间隔之后，之后每隔 `interval_ms` 触发一次。
pub fn start_repeating<F>(interval_ms: u64, mut callback: F) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let task = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval 的第一个 tick 立即完成，先消费掉
        ticker.tick().await;
        loop {
            ticker.tick().await;
            callback();
        }
    });
    TimerHandle { task: Some(task) }
}

/// 启动一次性延迟任务
pub fn start_once<F>(delay_ms: u64, callback: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        sleep(Duration::from_millis(delay_ms)).await;
        callback();
    });
    TimerHandle { task: Some(task) }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn repeating_timer_fires_every_interval() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let _handle = start_repeating(100, move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0, "首次回调不应立即触发");

        sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_callbacks() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let mut handle = start_repeating(100, move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        handle.stop();
        // 幂等：重复停止不报错
        handle.stop();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "停止后不应再触发回调");
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_fires_once_after_delay() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let _handle = start_once(200, move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(150)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_one_shot_never_fires() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        let mut handle = start_once(200, move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_millis(100)).await;
        handle.stop();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_the_timer() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);
        {
            let _handle = start_repeating(100, move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
