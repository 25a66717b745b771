// ==========================================
// 补货需求引擎 - 事实聚合器 (FactAggregator)
// ==========================================
// 职责: 单日销量 / 库存按 sku 汇总
// 前置: 聚合前刷新分区元数据（失败只告警，按当前可见分区继续）
// 红线: 订单必须先展开到 (订单, 明细) 粒度再按 sku 求和
// ==========================================

use crate::domain::facts::{FactSnapshot, InventoryFact, SalesFact};
use crate::repository::{FactStore, FactTable, RepositoryResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// FactAggregator
// ==========================================
pub struct FactAggregator<F>
where
    F: FactStore,
{
    store: Arc<F>,
}

impl<F> FactAggregator<F>
where
    F: FactStore,
{
    pub fn new(store: Arc<F>) -> Self {
        Self { store }
    }

    /// 刷新两张事实表的分区元数据
    ///
    /// # 返回
    /// 刷新失败的告警列表（空表示全部成功）
    pub fn refresh_partitions(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for table in [FactTable::RawOrders, FactTable::RawInventory] {
            if let Err(e) = self.store.sync_partitions(table) {
                warn!(table = %table, error = %e, "分区元数据刷新失败，按当前可见分区继续");
                warnings.push(format!("{}: {}", table, e));
            }
        }
        warnings
    }

    /// 单日销量汇总: sku → qty_sold
    #[instrument(skip(self))]
    pub fn aggregate_sales(&self, date: NaiveDate) -> RepositoryResult<BTreeMap<String, SalesFact>> {
        let orders = self.store.read_orders(date)?;

        let mut sales: BTreeMap<String, SalesFact> = BTreeMap::new();
        let mut line_count = 0usize;
        for line in orders.iter().flat_map(|order| order.flatten()) {
            line_count += 1;
            let fact = sales.entry(line.sku).or_default();
            fact.qty_sold = fact.qty_sold.saturating_add(line.quantity);
        }

        info!(
            order_count = orders.len(),
            line_count,
            sku_count = sales.len(),
            "销量汇总完成"
        );
        Ok(sales)
    }

    /// 单日库存汇总: sku → (qty_available, qty_reserved)
    #[instrument(skip(self))]
    pub fn aggregate_inventory(
        &self,
        date: NaiveDate,
    ) -> RepositoryResult<BTreeMap<String, InventoryFact>> {
        let rows = self.store.read_inventory(date)?;

        let mut inventory: BTreeMap<String, InventoryFact> = BTreeMap::new();
        for row in &rows {
            let fact = inventory.entry(row.sku.clone()).or_default();
            fact.qty_available = fact.qty_available.saturating_add(row.available_qty);
            fact.qty_reserved = fact.qty_reserved.saturating_add(row.reserved_qty);
        }

        info!(row_count = rows.len(), sku_count = inventory.len(), "库存汇总完成");
        Ok(inventory)
    }

    /// 刷新分区 + 销量汇总 + 库存汇总
    ///
    /// 对同一事实存储串行发起查询（同一时刻至多一个未完成查询）
    pub fn aggregate(&self, date: NaiveDate) -> RepositoryResult<FactSnapshot> {
        let refresh_warnings = self.refresh_partitions();
        let sales = self.aggregate_sales(date)?;
        let inventory = self.aggregate_inventory(date)?;

        Ok(FactSnapshot {
            sales,
            inventory,
            refresh_warnings,
        })
    }
}
