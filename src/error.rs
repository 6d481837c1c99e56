use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 输入校验错误（发起任何网络请求之前拦截）
    Validation(ValidationError),
    /// 任务创建错误
    Submission(SubmissionError),
    /// 状态轮询错误
    Poll(PollError),
    /// 服务端明确报告任务失败
    Job(JobFailure),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Submission(e) => write!(f, "提交错误: {}", e),
            AppError::Poll(e) => write!(f, "轮询错误: {}", e),
            AppError::Job(e) => write!(f, "任务失败: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Submission(e) => Some(e),
            AppError::Poll(e) => Some(e),
            AppError::Job(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 输入校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// 学习主题为空
    EmptyTopic,
    /// 学习级别为空
    EmptyLevel,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTopic => write!(f, "学习主题不能为空"),
            ValidationError::EmptyLevel => write!(f, "学习级别不能为空"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 任务创建错误
#[derive(Debug)]
pub enum SubmissionError {
    /// 创建请求失败（网络层）
    RequestFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非成功状态
    BadResponse {
        status: u16,
        message: Option<String>,
    },
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::RequestFailed { source } => {
                write!(f, "创建请求失败: {}", source)
            }
            SubmissionError::BadResponse { status, message } => {
                write!(
                    f,
                    "服务端返回错误响应: status={}, message={:?}",
                    status, message
                )
            }
        }
    }
}

impl std::error::Error for SubmissionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmissionError::RequestFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            SubmissionError::BadResponse { .. } => None,
        }
    }
}

/// 状态轮询错误
#[derive(Debug)]
pub enum PollError {
    /// 状态请求失败（网络层）
    RequestFailed {
        job_id: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非成功状态
    BadResponse {
        job_id: String,
        status: u16,
        message: Option<String>,
    },
    /// 响应解析失败
    ParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::RequestFailed { job_id, source } => {
                write!(f, "状态请求失败 (任务: {}): {}", job_id, source)
            }
            PollError::BadResponse {
                job_id,
                status,
                message,
            } => {
                write!(
                    f,
                    "状态查询返回错误响应 (任务: {}): status={}, message={:?}",
                    job_id, status, message
                )
            }
            PollError::ParseFailed { source } => {
                write!(f, "状态响应解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for PollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PollError::RequestFailed { source, .. } | PollError::ParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            PollError::BadResponse { .. } => None,
        }
    }
}

/// 服务端报告的任务失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    /// 服务端提供的错误信息（可能缺失）
    pub message: Option<String>,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}", msg),
            None => write!(f, "服务端未提供错误信息"),
        }
    }
}

impl std::error::Error for JobFailure {}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Poll(PollError::ParseFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建任务创建请求失败错误
    pub fn submission_request_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Submission(SubmissionError::RequestFailed {
            source: Box::new(source),
        })
    }

    /// 创建任务创建响应错误
    pub fn submission_bad_response(status: u16, message: Option<String>) -> Self {
        AppError::Submission(SubmissionError::BadResponse { status, message })
    }

    /// 创建状态请求失败错误
    pub fn poll_request_failed(
        job_id: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Poll(PollError::RequestFailed {
            job_id: job_id.into(),
            source: Box::new(source),
        })
    }

    /// 创建状态响应错误
    pub fn poll_bad_response(
        job_id: impl Into<String>,
        status: u16,
        message: Option<String>,
    ) -> Self {
        AppError::Poll(PollError::BadResponse {
            job_id: job_id.into(),
            status,
            message,
        })
    }

    /// 创建状态解析失败错误
    pub fn poll_parse_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Poll(PollError::ParseFailed {
            source: Box::new(source),
        })
    }

    /// 创建服务端任务失败错误
    pub fn job_failed(message: Option<String>) -> Self {
        AppError::Job(JobFailure { message })
    }

    /// 面向用户的提示文案
    ///
    /// 服务端给出的信息优先，缺失时回退到通用文案。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Submission(SubmissionError::BadResponse {
                message: Some(msg), ..
            }) => msg.clone(),
            AppError::Submission(_) => "启动学习任务失败".to_string(),
            AppError::Poll(PollError::BadResponse {
                message: Some(msg), ..
            }) => msg.clone(),
            AppError::Poll(_) => "查询任务状态失败".to_string(),
            AppError::Job(JobFailure { message: Some(msg) }) => msg.clone(),
            AppError::Job(_) => "任务执行失败".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
