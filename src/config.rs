/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_base_url: String,
    /// 状态轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 翻开第二张牌后到判定前的展示窗口（毫秒）
    pub reveal_delay_ms: u64,
    /// 判定不匹配后到盖回牌面的延迟（毫秒）
    pub mismatch_delay_ms: u64,
    /// 任务结束后游戏区域的缓冲隐藏延迟（毫秒）
    pub game_hide_grace_ms: u64,
    /// 进度区域淡出延迟（毫秒）
    pub progress_fade_ms: u64,
    /// 错误提示自动消失时间（毫秒）
    pub error_display_ms: u64,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 2000,
            reveal_delay_ms: 600,
            mismatch_delay_ms: 500,
            game_hide_grace_ms: 1000,
            progress_fade_ms: 1000,
            error_display_ms: 5000,
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("LEARNING_API_BASE_URL").unwrap_or(default.api_base_url),
            poll_interval_ms: std::env::var("POLL_INTERVAL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_interval_ms),
            reveal_delay_ms: std::env::var("REVEAL_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.reveal_delay_ms),
            mismatch_delay_ms: std::env::var("MISMATCH_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.mismatch_delay_ms),
            game_hide_grace_ms: std::env::var("GAME_HIDE_GRACE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.game_hide_grace_ms),
            progress_fade_ms: std::env::var("PROGRESS_FADE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.progress_fade_ms),
            error_display_ms: std::env::var("ERROR_DISPLAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.error_display_ms),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
