// ==========================================
// 补货需求引擎 - 配置层
// ==========================================
// 职责: 系统配置管理,支持多级覆写
// 存储: config_kv 表 + REPLENISH_* 环境变量
// ==========================================

pub mod config_manager;

// 重导出核心配置
pub use config_manager::{config_keys, default_master_db_path, ConfigManager, EngineConfig, LogFormat};
