// ==========================================
// 补货需求引擎 - 供应商分批 (SupplierBatcher)
// ==========================================
// 输入: 已计算完成的补货行（第一遍）
// 输出: 每个供应商一个批次（第二遍，单次分组）
// 约束: 批次内 sku 唯一，保持首次出现顺序
// 约束: 无补货行的供应商不产出批次
// ==========================================

use crate::domain::order::{OrderLine, SupplierOrderBatch};
use crate::engine::demand::SupplierLine;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

pub struct SupplierBatcher {
    origin_tag: String,
}

impl SupplierBatcher {
    /// # 参数
    /// - origin_tag: 写入批次 origin 字段的来源标记
    pub fn new(origin_tag: impl Into<String>) -> Self {
        Self {
            origin_tag: origin_tag.into(),
        }
    }

    /// 按供应商名称分组
    ///
    /// # 返回
    /// 批次按供应商名称升序；批次内按输入顺序
    pub fn batch(&self, date: NaiveDate, lines: Vec<SupplierLine>) -> Vec<SupplierOrderBatch> {
        let mut grouped: BTreeMap<String, (HashSet<String>, Vec<OrderLine>)> = BTreeMap::new();
        for SupplierLine { supplier_name, line } in lines {
            let (seen, group) = grouped.entry(supplier_name).or_default();
            if !seen.insert(line.sku.clone()) {
                warn!(sku = %line.sku, "同一批次内 sku 重复，保留首次出现");
                continue;
            }
            group.push(line);
        }

        let batches: Vec<SupplierOrderBatch> = grouped
            .into_iter()
            .filter(|(_, (_, group))| !group.is_empty())
            .map(|(supplier_name, (_, group))| SupplierOrderBatch {
                supplier_name,
                processing_date: date,
                origin_tag: self.origin_tag.clone(),
                lines: group,
            })
            .collect();

        info!(date = %date, batch_count = batches.len(), "供应商分批完成");
        batches
    }
}
