// ==========================================
// 补货需求引擎 - 净需求计算 (DemandCalculator)
// ==========================================
// 公式:
//   net_demand     = max(0, qty_sold + safety_stock - (qty_available - qty_reserved))
//   order_quantity = max(net_demand, moq)      仅当 net_demand > 0
// 红线: MOQ 在得出缺口之后兜底，不参与缺口计算
// 红线: 可售库存为负（预留 > 可用）不截断，直接抬高净需求
// ==========================================

use crate::domain::facts::FactSnapshot;
use crate::domain::master::MasterData;
use crate::domain::order::OrderLine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// 单 sku 计算输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandInput {
    pub qty_sold: i64,
    pub qty_available: i64,
    pub qty_reserved: i64,
    pub safety_stock: i64,
    pub moq: i64,
}

/// 单 sku 计算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandOutcome {
    pub net_demand: i64,
    /// 仅 net_demand > 0 时为 Some
    pub order_quantity: Option<i64>,
}

/// 可售库存为负的数据质量信号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAnomaly {
    pub sku: String,
    pub qty_available: i64,
    pub qty_reserved: i64,
}

/// 已归属供应商的补货行（分批前的中间结果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierLine {
    pub supplier_name: String,
    pub line: OrderLine,
}

/// 一次需求计算的完整产出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandPass {
    /// 按 sku 升序
    pub lines: Vec<SupplierLine>,
    pub skus_without_rule: Vec<String>,
    pub zero_demand_count: usize,
    pub anomalies: Vec<StockAnomaly>,
}

// ==========================================
// DemandCalculator
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct DemandCalculator;

impl DemandCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 纯函数: 单 sku 净需求与订货量
    pub fn compute(&self, input: &DemandInput) -> DemandOutcome {
        let sellable = input.qty_available.saturating_sub(input.qty_reserved);
        let net_demand = input
            .qty_sold
            .saturating_add(input.safety_stock)
            .saturating_sub(sellable)
            .max(0);

        let order_quantity = (net_demand > 0).then(|| net_demand.max(input.moq));

        DemandOutcome {
            net_demand,
            order_quantity,
        }
    }

    /// 以 sku 联结主数据与事实快照，计算全部补货行
    ///
    /// # 说明
    /// - 遍历范围: 销量 sku ∪ 库存 sku ∪ 主数据 sku（升序，保证确定性）
    /// - 无规则 sku: 记录后跳过
    /// - net_demand == 0: 不产出补货行
    #[instrument(skip_all, fields(master_count = master.len()))]
    pub fn compute_lines(&self, master: &MasterData, facts: &FactSnapshot) -> DemandPass {
        let universe: BTreeSet<String> = facts.skus().into_iter().chain(master.keys().cloned()).collect();

        let mut pass = DemandPass::default();
        for sku in universe {
            let Some(record) = master.get(&sku) else {
                debug!(sku = %sku, "sku 无补货规则，跳过");
                pass.skus_without_rule.push(sku);
                continue;
            };

            let sales = facts.sales_of(&sku);
            let stock = facts.inventory_of(&sku);
            if stock.sellable() < 0 {
                warn!(
                    sku = %sku,
                    qty_available = stock.qty_available,
                    qty_reserved = stock.qty_reserved,
                    "可售库存为负（预留 > 可用），按原值计入净需求"
                );
                pass.anomalies.push(StockAnomaly {
                    sku: sku.clone(),
                    qty_available: stock.qty_available,
                    qty_reserved: stock.qty_reserved,
                });
            }

            let outcome = self.compute(&DemandInput {
                qty_sold: sales.qty_sold,
                qty_available: stock.qty_available,
                qty_reserved: stock.qty_reserved,
                safety_stock: record.rule.safety_stock,
                moq: record.rule.moq,
            });

            match outcome.order_quantity {
                Some(order_quantity) => pass.lines.push(SupplierLine {
                    supplier_name: record.supplier_name.clone(),
                    line: OrderLine {
                        sku: sku.clone(),
                        product_name: record.name.clone(),
                        net_demand: outcome.net_demand,
                        order_quantity,
                    },
                }),
                None => pass.zero_demand_count += 1,
            }
        }

        info!(
            line_count = pass.lines.len(),
            zero_demand_count = pass.zero_demand_count,
            without_rule_count = pass.skus_without_rule.len(),
            anomaly_count = pass.anomalies.len(),
            "净需求计算完成"
        );
        pass
    }
}
