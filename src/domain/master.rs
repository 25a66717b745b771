// ==========================================
// 补货需求引擎 - 主数据领域模型
// ==========================================
// 实体: 商品 / 供应商 / 补货规则
// 红线: 主数据为只读快照，每次运行加载一次
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,         // 商品编码 (唯一)
    pub name: String,        // 商品名称
    pub supplier_id: String, // 所属供应商
}

// ==========================================
// Supplier - 供应商
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String, // 供应商编码 (唯一)
    pub name: String,        // 供应商名称
}

// ==========================================
// ReplenishmentRule - 补货规则
// ==========================================
// 每个 sku 至多一条规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentRule {
    pub safety_stock: i64, // 安全库存 (>= 0)
    pub moq: i64,          // 最小起订量 (> 0)
}

impl ReplenishmentRule {
    /// 规则是否满足数据约束
    pub fn is_valid(&self) -> bool {
        self.safety_stock >= 0 && self.moq > 0
    }
}

// ==========================================
// MasterRecord - 主数据联结结果（每 sku 一行）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub sku: String,
    pub name: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub rule: ReplenishmentRule,
}

/// sku → 主数据记录
///
/// 使用 BTreeMap 保证遍历顺序确定
pub type MasterData = BTreeMap<String, MasterRecord>;

/// 内存版三表内联结: products ⋈ suppliers ⋈ replenishment_rules
///
/// # 说明
/// - 缺少规则或供应商的 sku 不出现在结果中（不是错误）
/// - 规则不满足约束的 sku 记录告警后剔除
pub fn join_master_data(
    products: &[Product],
    suppliers: &[Supplier],
    rules: &HashMap<String, ReplenishmentRule>,
) -> MasterData {
    let supplier_names: HashMap<&str, &str> = suppliers
        .iter()
        .map(|s| (s.supplier_id.as_str(), s.name.as_str()))
        .collect();

    products
        .iter()
        .filter_map(|p| {
            let supplier_name = supplier_names.get(p.supplier_id.as_str())?;
            let rule = rules.get(&p.sku)?;
            if !rule.is_valid() {
                warn!(
                    sku = %p.sku,
                    safety_stock = rule.safety_stock,
                    moq = rule.moq,
                    "补货规则不合法，已剔除"
                );
                return None;
            }
            Some((
                p.sku.clone(),
                MasterRecord {
                    sku: p.sku.clone(),
                    name: p.name.clone(),
                    supplier_id: p.supplier_id.clone(),
                    supplier_name: supplier_name.to_string(),
                    rule: *rule,
                },
            ))
        })
        .collect()
}
