// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别，支持文本 / JSON 两种输出
// ==========================================

use crate::config::LogFormat;
use tracing_subscriber::{fmt, EnvFilter};

fn default_filter() -> EnvFilter {
    // 从环境变量读取日志级别，默认为 info
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统（文本格式）
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=replenish_engine=trace
///
/// # 示例
/// ```no_run
/// use replenish_engine::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// 初始化日志系统（JSON 行格式，便于日志采集）
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(default_filter())
        .with_current_span(true)
        .with_target(true)
        .init();
}

/// 按配置选择输出格式
pub fn init_with_format(format: LogFormat) {
    match format {
        LogFormat::Text => init(),
        LogFormat::Json => init_json(),
    }
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
