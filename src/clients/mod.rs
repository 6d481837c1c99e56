//! 后端客户端

pub mod learning_client;

pub use learning_client::HttpLearningClient;

use std::future::Future;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::job::{JobHandle, JobState};

/// 学习任务后端接口
///
/// 控制器只依赖这三个操作；生产环境走 HTTP 实现，测试里换成脚本化
/// 的模拟后端。
pub trait LearningBackend: Send + Sync + 'static {
    /// 创建学习任务，返回任务句柄
    fn start_learning(
        &self,
        topic: &str,
        level: &str,
    ) -> impl Future<Output = AppResult<JobHandle>> + Send;

    /// 查询任务状态快照
    fn job_status(&self, handle: &JobHandle) -> impl Future<Output = AppResult<JobState>> + Send;

    /// 构建报告下载地址（只拼 URL，不发起请求）
    fn download_report_url(&self, handle: &JobHandle) -> String;
}

impl<T: LearningBackend> LearningBackend for Arc<T> {
    fn start_learning(
        &self,
        topic: &str,
        level: &str,
    ) -> impl Future<Output = AppResult<JobHandle>> + Send {
        (**self).start_learning(topic, level)
    }

    fn job_status(&self, handle: &JobHandle) -> impl Future<Output = AppResult<JobState>> + Send {
        (**self).job_status(handle)
    }

    fn download_report_url(&self, handle: &JobHandle) -> String {
        (**self).download_report_url(handle)
    }
}
