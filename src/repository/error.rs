// ==========================================
// 补货需求引擎 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 主数据存储 / 事实存储 两类后端
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 主数据存储错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    // ===== 事实存储错误 =====
    #[error("事实存储不可达: {0}")]
    FactStoreUnavailable(String),

    #[error("事实查询失败 ({location}): {message}")]
    FactQueryError { location: String, message: String },

    #[error("分区元数据刷新失败 (table={table}): {message}")]
    PartitionSyncError { table: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 是否属于"后端不可达"类错误
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_) | RepositoryError::FactStoreUnavailable(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, ref msg)
                if e.code == rusqlite::ErrorCode::CannotOpen
                    || e.code == rusqlite::ErrorCode::NotADatabase =>
            {
                RepositoryError::DatabaseConnectionError(
                    msg.clone().unwrap_or_else(|| err.to_string()),
                )
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::FactQueryError {
            location: "io".to_string(),
            message: err.to_string(),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        let location = err
            .position()
            .map(|p| format!("csv line {}", p.line()))
            .unwrap_or_else(|| "csv".to_string());
        RepositoryError::FactQueryError {
            location,
            message: err.to_string(),
        }
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::FactQueryError {
            location: format!("json line {}", err.line()),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
