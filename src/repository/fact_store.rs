// ==========================================
// 补货需求引擎 - 分区事实存储
// ==========================================
// 红线: Repository 不含业务逻辑（不做汇总）
// 职责: 按日期读出未聚合的销售 / 库存事实行
// 约束: 只有已登记到分区目录（catalog）的分区可见
//       读取前必须先刷新分区元数据，否则会静默少算
// ==========================================

mod catalog;
mod partitioned;

pub use catalog::{PartitionCatalog, PartitionSpec};
pub use partitioned::PartitionedFileFactStore;

use crate::domain::facts::{InventoryRow, RawOrder};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;
use std::fmt;

// ==========================================
// FactTable - 事实表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactTable {
    RawOrders,    // POS 订单 (按 dt / store_id 分区, 嵌套明细)
    RawInventory, // 仓库库存 (按 dt 分区)
}

impl FactTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactTable::RawOrders => "raw_orders",
            FactTable::RawInventory => "raw_inventory",
        }
    }

    /// 表在存储根目录下的子目录名
    pub fn dir_name(&self) -> &'static str {
        match self {
            FactTable::RawOrders => "orders",
            FactTable::RawInventory => "inventory",
        }
    }

    /// 数据文件扩展名
    pub fn file_extension(&self) -> &'static str {
        match self {
            FactTable::RawOrders => "json",
            FactTable::RawInventory => "csv",
        }
    }
}

impl fmt::Display for FactTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// FactStore Trait
// ==========================================
// 用途: 引擎读取事实数据的窄接口
// 实现者: PartitionedFileFactStore
pub trait FactStore: Send + Sync {
    /// 刷新分区元数据（FULL 模式: 新增可见分区，移除已消失分区）
    ///
    /// # 返回
    /// - Ok(usize): 刷新后该表可见分区数
    /// - Err(PartitionSyncError): 刷新失败（调用方按告警处理）
    fn sync_partitions(&self, table: FactTable) -> RepositoryResult<usize>;

    /// 读取某日全部可见分区的订单（嵌套明细，未展开）
    fn read_orders(&self, date: NaiveDate) -> RepositoryResult<Vec<RawOrder>>;

    /// 读取某日全部可见分区的库存行
    fn read_inventory(&self, date: NaiveDate) -> RepositoryResult<Vec<InventoryRow>>;
}
