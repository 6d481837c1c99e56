//! 学习任务的数据模型与 API 报文类型

use std::fmt;

use serde::{Deserialize, Serialize};

/// 任务句柄
///
/// 服务端分配的不透明标识，控制器在单次任务生命周期内独占持有，
/// 终态或出错后清空。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 任务状态
///
/// 服务端未来可能新增状态值，未识别的字符串统一落到 `Unknown`，
/// 不中断轮询。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Starting,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// 是否为终态（completed / failed），终态后不再轮询
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// 单次轮询返回的任务快照
///
/// 只在当前轮询周期内持有，不做缓存。`summary` 仅在 completed 时出现，
/// `error` 仅在 failed 时有意义。
#[derive(Clone, Debug, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// 创建学习任务的请求体
#[derive(Debug, Serialize)]
pub struct StartLearningRequest {
    pub topic_name: String,
    pub learning_level: String,
}

/// 创建学习任务的响应体
#[derive(Debug, Deserialize)]
pub struct StartLearningResponse {
    pub job_id: String,
}

/// 服务端错误响应体（`{"error": "..."}`）
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_state_deserializes_known_statuses() {
        let state: JobState =
            serde_json::from_str(r#"{"status":"running","progress":"Analyzing topic..."}"#)
                .expect("解析失败");
        assert_eq!(state.status, JobStatus::Running);
        assert_eq!(state.progress.as_deref(), Some("Analyzing topic..."));
        assert!(state.summary.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn unrecognized_status_maps_to_unknown() {
        let state: JobState = serde_json::from_str(r#"{"status":"queued"}"#).expect("解析失败");
        assert_eq!(state.status, JobStatus::Unknown);
        assert!(!state.status.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Starting.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn job_state_ignores_extra_fields() {
        // 服务端的状态响应里还带 topic / level / started_at 等字段
        let state: JobState = serde_json::from_str(
            r#"{"status":"starting","progress":"Preparing...","topic":"Rust","level":"beginner","started_at":"2026-01-01T00:00:00"}"#,
        )
        .expect("解析失败");
        assert_eq!(state.status, JobStatus::Starting);
    }
}
