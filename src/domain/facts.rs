// ==========================================
// 补货需求引擎 - 事实数据领域模型
// ==========================================
// 销售事实: 一行一张订单，订单内嵌多条明细（需先展开再汇总）
// 库存事实: 一行一个 (仓库, sku)
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// 原始事实行（事实存储读出的未聚合数据）
// ==========================================

/// 订单明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
}

/// POS 订单（嵌套明细）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    pub order_id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// 展开后的订单行: 一行对应 (订单, 明细)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatOrderLine {
    pub order_id: String,
    pub sku: String,
    pub quantity: i64,
}

impl RawOrder {
    /// 展开为 (订单, 明细) 粒度
    pub fn flatten(&self) -> impl Iterator<Item = FlatOrderLine> + '_ {
        self.items.iter().map(move |item| FlatOrderLine {
            order_id: self.order_id.clone(),
            sku: item.sku.clone(),
            quantity: item.quantity,
        })
    }
}

/// 仓库库存行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub warehouse_id: String,
    pub sku: String,
    pub available_qty: i64,
    pub reserved_qty: i64,
}

// ==========================================
// 聚合后的事实（所有门店 / 所有仓库汇总）
// ==========================================

/// 单 sku 销量汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesFact {
    pub qty_sold: i64,
}

/// 单 sku 库存汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryFact {
    pub qty_available: i64,
    pub qty_reserved: i64,
}

impl InventoryFact {
    /// 可售库存 = 可用 - 预留（可能为负，属于数据质量信号）
    pub fn sellable(&self) -> i64 {
        self.qty_available.saturating_sub(self.qty_reserved)
    }
}

/// 单日事实快照
///
/// 缺失的 sku 一律视为 0 销量 / 0 可用 / 0 预留
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactSnapshot {
    pub sales: BTreeMap<String, SalesFact>,
    pub inventory: BTreeMap<String, InventoryFact>,
    /// 分区刷新失败时的告警（不影响运行）
    pub refresh_warnings: Vec<String>,
}

impl FactSnapshot {
    pub fn sales_of(&self, sku: &str) -> SalesFact {
        self.sales.get(sku).copied().unwrap_or_default()
    }

    pub fn inventory_of(&self, sku: &str) -> InventoryFact {
        self.inventory.get(sku).copied().unwrap_or_default()
    }

    /// 事实数据中出现过的全部 sku（销量 ∪ 库存）
    pub fn skus(&self) -> BTreeSet<String> {
        self.sales
            .keys()
            .chain(self.inventory.keys())
            .cloned()
            .collect()
    }
}
