// ==========================================
// 补货需求引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供主数据 / 事实数据的只读访问接口,屏蔽后端细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod fact_store;
pub mod master_data_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use fact_store::{FactStore, FactTable, PartitionCatalog, PartitionSpec, PartitionedFileFactStore};
pub use master_data_repo::{MasterDataSource, SqliteMasterDataRepository};
