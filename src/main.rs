use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use start_learning_client::{
    Config, ConsoleUi, HttpLearningClient, JobController, PlainSummaryRenderer,
};
use start_learning_client::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    logging::log_startup(&config);

    // 命令行参数：主题 [级别]
    let mut args = std::env::args().skip(1);
    let topic = args.next().unwrap_or_default();
    let level = args.next().unwrap_or_else(|| "intermediate".to_string());
    if topic.trim().is_empty() {
        bail!("用法: start_learning_client <学习主题> [学习级别]");
    }

    // 组装控制器并提交任务
    let client = HttpLearningClient::new(&config)?;
    let fade_ms = config.progress_fade_ms.max(config.game_hide_grace_ms);
    let controller = JobController::new(
        config,
        client,
        Arc::new(ConsoleUi),
        Arc::new(PlainSummaryRenderer),
    );

    controller.submit(&topic, &level).await?;
    controller.wait().await;

    // 等终态后的界面定时任务（淡出、游戏缓冲隐藏）走完再退出
    tokio::time::sleep(Duration::from_millis(fade_ms + 200)).await;

    Ok(())
}
