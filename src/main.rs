// ==========================================
// 补货需求引擎 - 命令行主入口
// ==========================================
// 用法:
//   replenish-engine [YYYY-MM-DD]
// 日期缺省为本地当天；配置见 config::EngineConfig
// 退出码: 0 = DONE, 1 = FAILED
// ==========================================

use chrono::{Local, NaiveDate};
use replenish_engine::config::EngineConfig;
use replenish_engine::engine::PublishOutcome;
use replenish_engine::output::{LocalDirectorySink, LocalMirrorTransport};
use replenish_engine::repository::{PartitionedFileFactStore, SqliteMasterDataRepository};
use replenish_engine::{logging, ReplenishmentEngine};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let config = EngineConfig::load()?;
    logging::init_with_format(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", replenish_engine::APP_NAME);
    tracing::info!("系统版本: {}", replenish_engine::VERSION);
    tracing::info!("==================================================");

    let date = match std::env::args().nth(1).map(|s| s.trim().to_string()) {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| format!("日期格式错误 (期望 YYYY-MM-DD): {}: {}", raw, e))?,
        _ => Local::now().date_naive(),
    };

    tracing::info!(
        date = %date,
        master_db = %config.master_db_path,
        fact_root = %config.fact_root.display(),
        output_root = %config.output_root.display(),
        "运行参数"
    );

    let engine = ReplenishmentEngine::new(
        Arc::new(SqliteMasterDataRepository::new(&config.master_db_path)),
        Arc::new(PartitionedFileFactStore::new(&config.fact_root)),
        Arc::new(LocalDirectorySink::new(&config.output_root)),
        config.origin_tag.clone(),
    );

    // 未配置远端时只落本地
    let result = match &config.remote_root {
        Some(remote_root) => {
            engine
                .run_and_publish(date, &LocalMirrorTransport::new(remote_root))
                .await
        }
        None => engine.run(date).map(|mut report| {
            report.publish = Some(PublishOutcome::Skipped);
            report
        }),
    };

    match result {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("运行失败 (state={}): {}", e.failed_state(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
