//! UI 宿主接口 - 业务能力层
//!
//! 页面各区块（进度条、结果区、游戏区、提交按钮、提示条）由控制器
//! 命令式驱动；除用户输入外没有事件回流。

use tracing::{info, warn};

use crate::utils::logging::truncate_text;

/// UI 宿主接口
///
/// 控制器唯一的界面出口，便于在测试中用记录型实现替换。
pub trait UiHost: Send + Sync {
    /// 更新进度条（百分比 + 文案）
    fn set_progress(&self, percent: u8, label: &str);
    /// 进度区域显示/隐藏
    fn set_progress_visible(&self, visible: bool);
    /// 写入渲染结果与报告下载地址
    fn set_results(&self, html: &str, download_url: &str);
    /// 结果区域显示/隐藏
    fn set_results_visible(&self, visible: bool);
    /// 游戏区域显示/隐藏
    fn set_game_visible(&self, visible: bool);
    /// 提交按钮可用/禁用
    fn set_submit_enabled(&self, enabled: bool);
    /// 显示错误提示
    fn show_error(&self, message: &str);
    /// 清除所有提示条
    fn clear_messages(&self);
}

/// 控制台 UI：用日志行模拟页面各区块的变化
pub struct ConsoleUi;

impl UiHost for ConsoleUi {
    fn set_progress(&self, percent: u8, label: &str) {
        info!("📊 进度 {}% - {}", percent, label);
    }

    fn set_progress_visible(&self, visible: bool) {
        if !visible {
            info!("进度区域已隐藏");
        }
    }

    fn set_results(&self, html: &str, download_url: &str) {
        info!("📄 学习报告:\n{}", html);
        info!("⬇️ 报告下载地址: {}", download_url);
    }

    fn set_results_visible(&self, visible: bool) {
        if visible {
            info!("✨ 结果区域已展示");
        }
    }

    fn set_game_visible(&self, visible: bool) {
        if visible {
            info!("🎮 等待期间可以玩翻牌游戏");
        } else {
            info!("游戏区域已隐藏");
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        if enabled {
            info!("提交按钮已恢复");
        }
    }

    fn show_error(&self, message: &str) {
        warn!("⚠️ {}", truncate_text(message, 200));
    }

    fn clear_messages(&self) {}
}
