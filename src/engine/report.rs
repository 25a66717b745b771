// ==========================================
// 补货需求引擎 - 运行报告
// ==========================================
// 汇总一次运行的状态轨迹、计数、数据质量信号与产物位置
// ==========================================

use crate::domain::order::SupplierOrderBatch;
use crate::domain::types::RunState;
use crate::engine::demand::StockAnomaly;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// 单个批次的摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub supplier: String,
    pub line_count: usize,
    pub total_order_quantity: i64,
    pub location: PathBuf,
}

impl BatchSummary {
    pub fn from_batch(batch: &SupplierOrderBatch, location: PathBuf) -> Self {
        Self {
            supplier: batch.supplier_name.clone(),
            line_count: batch.lines.len(),
            total_order_quantity: batch.total_order_quantity(),
            location,
        }
    }
}

/// 远端发布结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishOutcome {
    Published { remote_target: String, files_copied: usize },
    Failed { remote_target: String, message: String },
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub processing_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub states: Vec<RunState>,

    // ===== 计数 =====
    pub master_sku_count: usize,
    pub fact_sku_count: usize,
    pub skus_without_rule: Vec<String>,
    pub zero_demand_count: usize,
    pub line_count: usize,

    // ===== 数据质量 =====
    pub anomalies: Vec<StockAnomaly>,
    pub refresh_warnings: Vec<String>,

    // ===== 产物 =====
    pub output_dir: Option<PathBuf>,
    pub batches: Vec<BatchSummary>,
    pub publish: Option<PublishOutcome>,
}

impl RunReport {
    pub fn new(run_id: Uuid, processing_date: NaiveDate) -> Self {
        Self {
            run_id,
            processing_date,
            started_at: Utc::now(),
            finished_at: None,
            states: Vec::new(),
            master_sku_count: 0,
            fact_sku_count: 0,
            skus_without_rule: Vec::new(),
            zero_demand_count: 0,
            line_count: 0,
            anomalies: Vec::new(),
            refresh_warnings: Vec::new(),
            output_dir: None,
            batches: Vec::new(),
            publish: None,
        }
    }

    /// 运行最终状态
    pub fn final_state(&self) -> Option<RunState> {
        self.states.last().copied()
    }
}
