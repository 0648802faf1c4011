/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则默认 `info`，`verbose` 时为 `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!("📁 PDF 目录: {}", config.source_dir);
    info!("{}", "=".repeat(60));
}

/// 记录文档开始处理
///
/// # 参数
/// - `name`: 源文件名
/// - `text_len`: 提取出的文本字符数
pub fn log_document_start(name: &str, text_len: usize) {
    info!("\n{}", "─".repeat(60));
    info!("📄 开始处理: {}", name);
    info!("📝 提取文本: {} 字符", text_len);
}

/// 记录文档处理完成
///
/// # 参数
/// - `output`: 输出文件路径
/// - `total`: 生成的题目总数
pub fn log_document_complete(output: &str, total: usize) {
    info!("✅ 共生成 {} 道题目，已保存至: {}", total, output);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
