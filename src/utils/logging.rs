/// 日志工具模块
///
/// 初始化 tracing，并提供抓取流程的横幅输出
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时按 `verbose` 选择 debug / info。
/// 重复调用不会报错，测试里可以随意调用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "recipe_scraper={},chromiumoxide=warn",
            default_level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `target`: 本次抓取目标（来源名或"全部来源"）
/// - `limit`: 每个来源最多抓取的菜谱数
pub fn log_startup(target: &str, limit: u32) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始抓取空气炸锅菜谱");
    info!("📋 目标: {}", target);
    info!("📊 每个来源最多: {} 个", limit);
    info!("{}", "=".repeat(60));
}

/// 记录单个来源开始
pub fn log_source_start(index: usize, total: usize, source: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始抓取第 {}/{} 个来源: {}", index, total, source);
    info!("{}", "=".repeat(60));
}

/// 记录单个来源完成
pub fn log_source_complete(source: &str, added: u32, updated: u32, failed: u32, total: u32) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ {} 完成: 新增 {} / 更新 {} / 失败 {} / 共 {}",
        source, added, updated, failed, total
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `added`: 新增数量
/// - `updated`: 更新数量
/// - `failed`: 失败数量
/// - `failed_sources`: 整体失败的来源数
pub fn print_final_stats(added: u32, updated: u32, failed: u32, failed_sources: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部抓取完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 新增: {}", added);
    info!("🔄 更新: {}", updated);
    info!("❌ 失败: {}", failed);
    if failed_sources > 0 {
        info!("⚠️ 整体失败的来源: {}", failed_sources);
    }
    info!("{}", "=".repeat(60));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Air fryer chips", 9), "Air fryer...");
        assert_eq!(truncate_text("Chips", 9), "Chips");
        // 按字符截断，不按字节
        assert_eq!(truncate_text("空气炸锅薯条", 4), "空气炸锅...");
    }

    #[test]
    fn test_init_twice() {
        init(false);
        init(true);
    }
}
