// ==========================================
// 补货需求引擎 - 引擎层
// ==========================================
// 职责: 事实聚合 → 净需求计算 → 供应商分批 → 输出编排
// 红线: Engine 不拼 SQL，数据访问只经由仓储 trait
// ==========================================

pub mod aggregator;
pub mod batcher;
pub mod demand;
pub mod error;
pub mod orchestrator;
pub mod report;

// 重导出核心引擎
pub use aggregator::FactAggregator;
pub use batcher::SupplierBatcher;
pub use demand::{DemandCalculator, DemandInput, DemandOutcome, DemandPass, StockAnomaly, SupplierLine};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{ReplenishmentEngine, RunTracker};
pub use report::{BatchSummary, PublishOutcome, RunReport};
