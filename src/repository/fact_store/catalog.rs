// ==========================================
// 补货需求引擎 - 分区目录 (Partition Catalog)
// ==========================================
// 记录每张事实表当前"已登记"的分区
// 读取只看目录中的分区，目录陈旧即少算
// ==========================================

use super::FactTable;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

/// 分区描述
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionSpec {
    pub dt: NaiveDate,
    pub store_id: Option<String>,
    pub path: PathBuf,
}

/// 分区目录
#[derive(Debug, Default)]
pub struct PartitionCatalog {
    tables: RwLock<HashMap<FactTable, BTreeSet<PartitionSpec>>>,
}

impl PartitionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以扫描结果整体替换某表的分区集合（FULL 同步语义）
    pub fn replace(&self, table: FactTable, partitions: BTreeSet<PartitionSpec>) -> RepositoryResult<()> {
        let mut guard = self
            .tables
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard.insert(table, partitions);
        Ok(())
    }

    /// 登记单个分区（ADD 语义）
    pub fn register(&self, table: FactTable, partition: PartitionSpec) -> RepositoryResult<()> {
        let mut guard = self
            .tables
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard.entry(table).or_default().insert(partition);
        Ok(())
    }

    /// 某表某日的可见分区（按路径有序）
    pub fn partitions_for(&self, table: FactTable, dt: NaiveDate) -> RepositoryResult<Vec<PartitionSpec>> {
        let guard = self
            .tables
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard
            .get(&table)
            .map(|set| set.iter().filter(|p| p.dt == dt).cloned().collect())
            .unwrap_or_default())
    }

    /// 某表可见分区总数
    pub fn partition_count(&self, table: FactTable) -> RepositoryResult<usize> {
        let guard = self
            .tables
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.get(&table).map(|set| set.len()).unwrap_or(0))
    }
}
