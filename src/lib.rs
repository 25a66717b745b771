// ==========================================
// 补货需求引擎 - 核心库
// ==========================================
// 输入: 每日 POS 销售事实 + 仓库库存事实 + 主数据
// 输出: 按供应商分组的补货订单文件
// 系统定位: 每日批处理作业 (单日单次运行)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 主数据 / 事实数据访问
pub mod repository;

// 引擎层 - 聚合、需求计算、供应商分批、运行编排
pub mod engine;

// 输出层 - 批次落盘与远端传输
pub mod output;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::RunState;

// 领域实体
pub use domain::{
    FactSnapshot, InventoryFact, MasterRecord, OrderLine, Product, ReplenishmentRule, SalesFact,
    Supplier, SupplierOrderBatch,
};

// 引擎
pub use engine::{
    DemandCalculator, EngineError, FactAggregator, ReplenishmentEngine, RunReport,
    SupplierBatcher,
};

// 仓储
pub use repository::{
    FactStore, MasterDataSource, PartitionedFileFactStore, SqliteMasterDataRepository,
};

// 输出
pub use output::{ArtifactTransport, LocalDirectorySink, LocalMirrorTransport, OutputSink};

// 配置
pub use config::EngineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "补货需求引擎";

// 默认来源标记（写入每个批次文件的 origin 字段）
pub const DEFAULT_ORIGIN_TAG: &str = "Computed via replenish-engine";
