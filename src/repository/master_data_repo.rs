// ==========================================
// 补货需求引擎 - 主数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: products ⋈ suppliers ⋈ replenishment_rules → sku 索引
// 约束: 存储不可达即整次运行失败，无"部分主数据"模式
// ==========================================

use crate::db::open_sqlite_connection_readonly;
use crate::domain::master::{MasterData, MasterRecord, ReplenishmentRule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

// ==========================================
// MasterDataSource Trait
// ==========================================
// 用途: 引擎读取主数据的窄接口（便于用内存实现替换）
// 实现者: SqliteMasterDataRepository
pub trait MasterDataSource: Send + Sync {
    /// 加载 sku → {name, supplier_id, supplier_name, safety_stock, moq}
    ///
    /// # 返回
    /// - Ok(MasterData): 缺少规则的 sku 不在结果中
    /// - Err(DatabaseConnectionError): 存储不可达
    fn load(&self) -> RepositoryResult<MasterData>;
}

const MASTER_JOIN_SQL: &str = r#"
    SELECT p.sku, p.name, p.supplier_id, s.name, r.safety_stock, r.moq
    FROM products p
    JOIN suppliers s ON p.supplier_id = s.supplier_id
    JOIN replenishment_rules r ON p.sku = r.sku
    ORDER BY p.sku
"#;

enum ConnectionSource {
    Path(String),
    Shared(Arc<Mutex<Connection>>),
}

// ==========================================
// SqliteMasterDataRepository - SQLite 主数据仓储
// ==========================================
pub struct SqliteMasterDataRepository {
    source: ConnectionSource,
}

impl SqliteMasterDataRepository {
    /// 创建仓储实例（连接在 load 时以只读方式打开）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Self {
        Self {
            source: ConnectionSource::Path(db_path.to_string()),
        }
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            source: ConnectionSource::Shared(conn),
        }
    }

    fn query_master(conn: &Connection) -> RepositoryResult<MasterData> {
        let mut stmt = conn.prepare(MASTER_JOIN_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok(MasterRecord {
                sku: row.get(0)?,
                name: row.get(1)?,
                supplier_id: row.get(2)?,
                supplier_name: row.get(3)?,
                rule: ReplenishmentRule {
                    safety_stock: row.get(4)?,
                    moq: row.get(5)?,
                },
            })
        })?;

        let mut master = MasterData::new();
        let mut rejected = 0usize;
        for row in rows {
            let record = row?;
            if !record.rule.is_valid() {
                warn!(
                    sku = %record.sku,
                    safety_stock = record.rule.safety_stock,
                    moq = record.rule.moq,
                    "补货规则不合法，已剔除"
                );
                rejected += 1;
                continue;
            }
            master.insert(record.sku.clone(), record);
        }

        debug!(rejected, "主数据规则校验完成");
        Ok(master)
    }
}

impl MasterDataSource for SqliteMasterDataRepository {
    fn load(&self) -> RepositoryResult<MasterData> {
        let master = match &self.source {
            ConnectionSource::Path(path) => {
                let conn = open_sqlite_connection_readonly(path).map_err(|e| {
                    RepositoryError::DatabaseConnectionError(format!("{}: {}", path, e))
                })?;
                Self::query_master(&conn)?
            }
            ConnectionSource::Shared(conn) => {
                let guard = conn
                    .lock()
                    .map_err(|e| RepositoryError::LockError(e.to_string()))?;
                Self::query_master(&guard)?
            }
        };

        info!(sku_count = master.len(), "主数据加载完成");
        Ok(master)
    }
}
