// ==========================================
// 补货需求引擎 - Hive 风格目录事实存储
// ==========================================
// 目录布局:
//   <root>/orders/dt=YYYY-MM-DD/store_id=<store>/*.json   (NDJSON, 一行一单)
//   <root>/inventory/dt=YYYY-MM-DD/*.csv                  (带表头)
// ==========================================

use super::catalog::{PartitionCatalog, PartitionSpec};
use super::{FactStore, FactTable};
use crate::domain::facts::{InventoryRow, RawOrder};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DT_PREFIX: &str = "dt=";
const STORE_PREFIX: &str = "store_id=";

// ==========================================
// PartitionedFileFactStore
// ==========================================
pub struct PartitionedFileFactStore {
    root: PathBuf,
    catalog: PartitionCatalog,
}

impl PartitionedFileFactStore {
    /// 创建事实存储（分区目录初始为空，需先 sync_partitions）
    ///
    /// # 参数
    /// - root: 存储根目录
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            catalog: PartitionCatalog::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &PartitionCatalog {
        &self.catalog
    }

    fn table_root(&self, table: FactTable) -> PathBuf {
        self.root.join(table.dir_name())
    }

    fn ensure_table_root(&self, table: FactTable) -> RepositoryResult<PathBuf> {
        let table_root = self.table_root(table);
        if !table_root.is_dir() {
            return Err(RepositoryError::FactStoreUnavailable(format!(
                "{} 不存在: {}",
                table,
                table_root.display()
            )));
        }
        Ok(table_root)
    }

    /// 扫描某表的全部分区目录
    fn scan_partitions(&self, table: FactTable) -> RepositoryResult<BTreeSet<PartitionSpec>> {
        let table_root = self.table_root(table);
        let entries = fs::read_dir(&table_root).map_err(|e| RepositoryError::PartitionSyncError {
            table: table.to_string(),
            message: format!("{}: {}", table_root.display(), e),
        })?;

        let mut partitions = BTreeSet::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(dt) = parse_dt_dir(&path) else {
                debug!(path = %path.display(), "跳过非分区目录");
                continue;
            };

            match table {
                FactTable::RawInventory => {
                    partitions.insert(PartitionSpec { dt, store_id: None, path });
                }
                FactTable::RawOrders => {
                    for store_entry in fs::read_dir(&path)? {
                        let store_path = store_entry?.path();
                        if !store_path.is_dir() {
                            continue;
                        }
                        if let Some(store_id) = dir_value(&store_path, STORE_PREFIX) {
                            partitions.insert(PartitionSpec {
                                dt,
                                store_id: Some(store_id),
                                path: store_path,
                            });
                        }
                    }
                }
            }
        }

        Ok(partitions)
    }

    /// 某日可见分区内的全部数据文件（路径有序，保证读取顺序确定）
    fn partition_files(&self, table: FactTable, date: NaiveDate) -> RepositoryResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for partition in self.catalog.partitions_for(table, date)? {
            let entries = match fs::read_dir(&partition.path) {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    // 已登记但目录已消失: 等同空分区
                    warn!(path = %partition.path.display(), "已登记分区不存在，按空分区处理");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            for entry in entries {
                let path = entry?.path();
                let matches_ext = path
                    .extension()
                    .map(|ext| ext == table.file_extension())
                    .unwrap_or(false);
                if path.is_file() && matches_ext {
                    files.push(path);
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

impl FactStore for PartitionedFileFactStore {
    fn sync_partitions(&self, table: FactTable) -> RepositoryResult<usize> {
        let partitions = self.scan_partitions(table)?;
        let count = partitions.len();
        self.catalog.replace(table, partitions)?;

        info!(table = %table, partition_count = count, "分区元数据已刷新");
        Ok(count)
    }

    fn read_orders(&self, date: NaiveDate) -> RepositoryResult<Vec<RawOrder>> {
        self.ensure_table_root(FactTable::RawOrders)?;

        let mut orders = Vec::new();
        for file in self.partition_files(FactTable::RawOrders, date)? {
            let reader = BufReader::new(File::open(&file)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let order: RawOrder =
                    serde_json::from_str(&line).map_err(|e| RepositoryError::FactQueryError {
                        location: format!("{}:{}", file.display(), idx + 1),
                        message: e.to_string(),
                    })?;
                orders.push(order);
            }
        }

        debug!(date = %date, order_count = orders.len(), "订单事实读取完成");
        Ok(orders)
    }

    fn read_inventory(&self, date: NaiveDate) -> RepositoryResult<Vec<InventoryRow>> {
        self.ensure_table_root(FactTable::RawInventory)?;

        let mut rows = Vec::new();
        for file in self.partition_files(FactTable::RawInventory, date)? {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .trim(Trim::All)
                .from_path(&file)?;
            for record in reader.deserialize::<InventoryRow>() {
                let row = record.map_err(|e| RepositoryError::FactQueryError {
                    location: file.display().to_string(),
                    message: e.to_string(),
                })?;
                rows.push(row);
            }
        }

        debug!(date = %date, row_count = rows.len(), "库存事实读取完成");
        Ok(rows)
    }
}

/// 解析 `dt=YYYY-MM-DD` 目录
fn parse_dt_dir(path: &Path) -> Option<NaiveDate> {
    let value = dir_value(path, DT_PREFIX)?;
    match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        Ok(dt) => Some(dt),
        Err(_) => {
            warn!(path = %path.display(), "分区日期格式错误，已跳过");
            None
        }
    }
}

/// 读取 `<prefix><value>` 目录名中的 value
fn dir_value(path: &Path, prefix: &str) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix(prefix))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
