//! 学习任务 HTTP 客户端
//!
//! 封装与后端两个接口的全部交互：
//! - `POST /api/start-learning`
//! - `GET  /api/job-status/{job_id}`

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::clients::LearningBackend;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::job::{
    ApiErrorBody, JobHandle, JobState, StartLearningRequest, StartLearningResponse,
};

/// 学习任务 HTTP 客户端
pub struct HttpLearningClient {
    http: Client,
    base_url: String,
}

impl HttpLearningClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("HTTP 客户端初始化失败: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl LearningBackend for HttpLearningClient {
    async fn start_learning(&self, topic: &str, level: &str) -> AppResult<JobHandle> {
        let url = format!("{}/api/start-learning", self.base_url);
        let body = StartLearningRequest {
            topic_name: topic.to_string(),
            learning_level: level.to_string(),
        };

        debug!("POST {} topic={} level={}", url, topic, level);

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(AppError::submission_request_failed)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.json::<ApiErrorBody>().await.ok().and_then(|b| b.error);
            return Err(AppError::submission_bad_response(status.as_u16(), message));
        }

        let created: StartLearningResponse = resp
            .json()
            .await
            .map_err(AppError::submission_request_failed)?;

        Ok(JobHandle::new(created.job_id))
    }

    async fn job_status(&self, handle: &JobHandle) -> AppResult<JobState> {
        let url = format!("{}/api/job-status/{}", self.base_url, handle);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::poll_request_failed(handle.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.json::<ApiErrorBody>().await.ok().and_then(|b| b.error);
            return Err(AppError::poll_bad_response(
                handle.as_str(),
                status.as_u16(),
                message,
            ));
        }

        let state: JobState = resp.json().await.map_err(AppError::poll_parse_failed)?;
        debug!("任务 {} 状态: {:?}", handle, state.status);
        Ok(state)
    }

    fn download_report_url(&self, handle: &JobHandle) -> String {
        format!("{}/api/download-report/{}", self.base_url, handle)
    }
}
