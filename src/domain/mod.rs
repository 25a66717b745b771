// ==========================================
// 补货需求引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod facts;
pub mod master;
pub mod order;
pub mod types;

// 重导出核心类型
pub use facts::{
    FactSnapshot, FlatOrderLine, InventoryFact, InventoryRow, OrderItem, RawOrder, SalesFact,
};
pub use master::{join_master_data, MasterData, MasterRecord, Product, ReplenishmentRule, Supplier};
pub use order::{OrderLine, SupplierOrderBatch};
pub use types::RunState;
