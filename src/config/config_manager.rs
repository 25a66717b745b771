// ==========================================
// 补货需求引擎 - 配置管理器
// ==========================================
// 职责: 配置加载与多级覆写
// 层级（低 → 高）: 内置默认值 → config_kv 表 (scope_id='global') → 环境变量
// ==========================================

use crate::db::{open_sqlite_connection_readonly, table_exists};
use crate::DEFAULT_ORIGIN_TAG;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // config_kv 键
    pub const FACT_ROOT: &str = "fact_root";
    pub const OUTPUT_ROOT: &str = "output_root";
    pub const REMOTE_ROOT: &str = "remote_root";
    pub const ORIGIN_TAG: &str = "origin_tag";
    pub const LOG_FORMAT: &str = "log_format";

    // 环境变量
    pub const ENV_MASTER_DB: &str = "REPLENISH_MASTER_DB";
    pub const ENV_FACT_ROOT: &str = "REPLENISH_FACT_ROOT";
    pub const ENV_OUTPUT_ROOT: &str = "REPLENISH_OUTPUT_DIR";
    pub const ENV_REMOTE_ROOT: &str = "REPLENISH_REMOTE_ROOT";
    pub const ENV_ORIGIN_TAG: &str = "REPLENISH_ORIGIN_TAG";
    pub const ENV_LOG_FORMAT: &str = "REPLENISH_LOG_FORMAT";
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text, // 默认 TEXT
        }
    }
}

// ==========================================
// EngineConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub master_db_path: String,
    pub fact_root: PathBuf,
    pub output_root: PathBuf,
    pub remote_root: Option<PathBuf>,
    pub origin_tag: String,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            master_db_path: default_master_db_path(),
            fact_root: PathBuf::from("./generated_data"),
            output_root: PathBuf::from("./generated_data/supplier_orders"),
            remote_root: None,
            origin_tag: DEFAULT_ORIGIN_TAG.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl EngineConfig {
    /// 从默认值 + config_kv + 进程环境变量加载
    ///
    /// 说明：主数据库不存在时跳过 config_kv 层（运行时再按连接失败处理）
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("REPLENISH_"))
            .collect();

        let master_db_path = non_empty(env.get(config_keys::ENV_MASTER_DB))
            .unwrap_or_else(default_master_db_path);

        let kv = if Path::new(&master_db_path).is_file() {
            ConfigManager::new(&master_db_path)?.load_global()?
        } else {
            debug!(path = %master_db_path, "主数据库不存在，跳过 config_kv 配置层");
            HashMap::new()
        };

        Ok(Self::from_layers(master_db_path, &kv, &env))
    }

    /// 按层级合并配置（不读取进程环境，便于测试）
    pub fn from_layers(
        master_db_path: String,
        kv: &HashMap<String, String>,
        env: &HashMap<String, String>,
    ) -> Self {
        let mut config = Self {
            master_db_path,
            ..Self::default()
        };

        let layers: [(&HashMap<String, String>, [&str; 5]); 2] = [
            (
                kv,
                [
                    config_keys::FACT_ROOT,
                    config_keys::OUTPUT_ROOT,
                    config_keys::REMOTE_ROOT,
                    config_keys::ORIGIN_TAG,
                    config_keys::LOG_FORMAT,
                ],
            ),
            (
                env,
                [
                    config_keys::ENV_FACT_ROOT,
                    config_keys::ENV_OUTPUT_ROOT,
                    config_keys::ENV_REMOTE_ROOT,
                    config_keys::ENV_ORIGIN_TAG,
                    config_keys::ENV_LOG_FORMAT,
                ],
            ),
        ];

        for (source, [fact_root, output_root, remote_root, origin_tag, log_format]) in layers {
            if let Some(v) = non_empty(source.get(fact_root)) {
                config.fact_root = PathBuf::from(v);
            }
            if let Some(v) = non_empty(source.get(output_root)) {
                config.output_root = PathBuf::from(v);
            }
            if let Some(v) = non_empty(source.get(remote_root)) {
                config.remote_root = Some(PathBuf::from(v));
            }
            if let Some(v) = non_empty(source.get(origin_tag)) {
                config.origin_tag = v;
            }
            if let Some(v) = non_empty(source.get(log_format)) {
                config.log_format = LogFormat::parse(&v);
            }
        }

        config
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 默认主数据库路径（用户数据目录下）
pub fn default_master_db_path() -> String {
    let mut path = PathBuf::from("./procurement.db");

    if let Some(data_dir) = dirs::data_dir() {
        path = data_dir.join("replenish-engine").join("procurement.db");
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// ConfigManager - config_kv 读取
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 以只读方式打开主数据库
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection_readonly(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取 global scope 的单个配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        if !table_exists(&conn, "config_kv")? {
            return Ok(None);
        }

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的全部配置
    ///
    /// config_kv 表不存在时返回空集合
    pub fn load_global(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        if !table_exists(&conn, "config_kv")? {
            return Ok(HashMap::new());
        }

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }
}
