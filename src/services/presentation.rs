//! 结果渲染接口 - 业务能力层
//!
//! Markdown 到 HTML 的真正渲染（代码高亮、外链处理）由外部协作者
//! 完成；这里只定义控制器在任务完成时调用的窄接口。

/// 结果渲染器
pub trait SummaryRenderer: Send + Sync {
    /// 渲染 Markdown 总结，返回可直接展示的片段
    fn render(&self, markdown: &str) -> String;
}

/// 透传渲染器：原样输出 Markdown 文本
///
/// 命令行场景下 Markdown 本身就可读，不做任何转换。
pub struct PlainSummaryRenderer;

impl SummaryRenderer for PlainSummaryRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}
