// ==========================================
// 补货需求引擎 - 补货订单领域模型
// ==========================================
// OrderLine: 单 sku 补货行（仅 net_demand > 0 时存在）
// SupplierOrderBatch: 单供应商单日的补货批次（输出单元）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// OrderLine - 补货行
// ==========================================
// 不单独持久化，仅作为批次文件的 items 元素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    #[serde(rename = "product")]
    pub product_name: String,
    pub net_demand: i64,
    #[serde(rename = "final_order_quantity")]
    pub order_quantity: i64,
}

// ==========================================
// SupplierOrderBatch - 供应商批次
// ==========================================
// 序列化格式即输出文件格式:
// {"supplier", "date", "origin", "items": [...]}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOrderBatch {
    #[serde(rename = "supplier")]
    pub supplier_name: String,
    #[serde(rename = "date")]
    pub processing_date: NaiveDate,
    #[serde(rename = "origin")]
    pub origin_tag: String,
    #[serde(rename = "items")]
    pub lines: Vec<OrderLine>,
}

impl SupplierOrderBatch {
    /// 批次内补货总量
    pub fn total_order_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.order_quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_document_shape() {
        let batch = SupplierOrderBatch {
            supplier_name: "Cosumar".to_string(),
            processing_date: NaiveDate::from_ymd_opt(2026, 1, 8).unwrap(),
            origin_tag: "unit-test".to_string(),
            lines: vec![OrderLine {
                sku: "PRD-004".to_string(),
                product_name: "Thé Sultan Vert".to_string(),
                net_demand: 12,
                order_quantity: 20,
            }],
        };

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({
                "supplier": "Cosumar",
                "date": "2026-01-08",
                "origin": "unit-test",
                "items": [{
                    "sku": "PRD-004",
                    "product": "Thé Sultan Vert",
                    "net_demand": 12,
                    "final_order_quantity": 20
                }]
            })
        );
        assert_eq!(batch.total_order_quantity(), 20);
    }
}
