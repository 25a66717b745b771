// ==========================================
// 内存 Fake 实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDate;
use replenish_engine::domain::{
    join_master_data, InventoryRow, MasterData, OrderItem, Product, RawOrder, ReplenishmentRule,
    Supplier,
};
use replenish_engine::output::{ArtifactTransport, PublishReceipt, TransportError};
use replenish_engine::repository::{FactStore, FactTable, RepositoryError, RepositoryResult};
use replenish_engine::MasterDataSource;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

// ==========================================
// InMemoryMasterData
// ==========================================

// 按三张主数据表保存，load 时做内存联结
#[derive(Default)]
pub struct InMemoryMasterData {
    products: Vec<Product>,
    suppliers: Vec<Supplier>,
    rules: HashMap<String, ReplenishmentRule>,
    unreachable: AtomicBool,
}

impl InMemoryMasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个带规则的 sku（供应商按名称自动登记）
    pub fn with_sku(mut self, sku: &str, supplier: &str, safety_stock: i64, moq: i64) -> Self {
        let supplier_id = format!("ID-{}", supplier);
        if !self.suppliers.iter().any(|s| s.supplier_id == supplier_id) {
            self.suppliers.push(Supplier {
                supplier_id: supplier_id.clone(),
                name: supplier.to_string(),
            });
        }
        self.products.push(Product {
            sku: sku.to_string(),
            name: format!("商品 {}", sku),
            supplier_id,
        });
        self.rules
            .insert(sku.to_string(), ReplenishmentRule { safety_stock, moq });
        self
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }
}

impl MasterDataSource for InMemoryMasterData {
    fn load(&self) -> RepositoryResult<MasterData> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseConnectionError(
                "内存主数据被设置为不可达".to_string(),
            ));
        }
        Ok(join_master_data(&self.products, &self.suppliers, &self.rules))
    }
}

// ==========================================
// InMemoryFactStore
// ==========================================

#[derive(Default)]
pub struct InMemoryFactStore {
    orders: HashMap<NaiveDate, Vec<RawOrder>>,
    inventory: HashMap<NaiveDate, Vec<InventoryRow>>,
    unreachable: AtomicBool,
    sync_fails: AtomicBool,
    sync_calls: AtomicUsize,
}

impl InMemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, date: NaiveDate, order: RawOrder) -> Self {
        self.orders.entry(date).or_default().push(order);
        self
    }

    pub fn with_inventory(
        mut self,
        date: NaiveDate,
        warehouse_id: &str,
        sku: &str,
        available_qty: i64,
        reserved_qty: i64,
    ) -> Self {
        self.inventory.entry(date).or_default().push(InventoryRow {
            warehouse_id: warehouse_id.to_string(),
            sku: sku.to_string(),
            available_qty,
            reserved_qty,
        });
        self
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn set_sync_fails(&self, fails: bool) {
        self.sync_fails.store(fails, Ordering::SeqCst);
    }

    pub fn sync_calls(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> RepositoryResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RepositoryError::FactStoreUnavailable(
                "内存事实存储被设置为不可达".to_string(),
            ));
        }
        Ok(())
    }
}

impl FactStore for InMemoryFactStore {
    fn sync_partitions(&self, table: FactTable) -> RepositoryResult<usize> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        if self.sync_fails.load(Ordering::SeqCst) {
            return Err(RepositoryError::PartitionSyncError {
                table: table.to_string(),
                message: "分区刷新被设置为失败".to_string(),
            });
        }
        Ok(match table {
            FactTable::RawOrders => self.orders.len(),
            FactTable::RawInventory => self.inventory.len(),
        })
    }

    fn read_orders(&self, date: NaiveDate) -> RepositoryResult<Vec<RawOrder>> {
        self.check_reachable()?;
        Ok(self.orders.get(&date).cloned().unwrap_or_default())
    }

    fn read_inventory(&self, date: NaiveDate) -> RepositoryResult<Vec<InventoryRow>> {
        self.check_reachable()?;
        Ok(self.inventory.get(&date).cloned().unwrap_or_default())
    }
}

/// 构造订单: items 为 (sku, 数量)
pub fn order(order_id: &str, items: &[(&str, i64)]) -> RawOrder {
    RawOrder {
        order_id: order_id.to_string(),
        timestamp: Some("2026-01-08T10:00:00".to_string()),
        items: items
            .iter()
            .map(|(sku, quantity)| OrderItem {
                sku: sku.to_string(),
                quantity: *quantity,
                unit_price: 1.0,
            })
            .collect(),
    }
}

// ==========================================
// FailingTransport - 发布总是失败
// ==========================================

pub struct FailingTransport;

#[async_trait]
impl ArtifactTransport for FailingTransport {
    fn remote_target_for(&self, date: NaiveDate) -> String {
        format!("unreachable://replenishment/{}", date)
    }

    async fn publish(
        &self,
        local_dir: &Path,
        remote_target: &str,
    ) -> Result<PublishReceipt, TransportError> {
        Err(TransportError::CopyFailed {
            source_path: PathBuf::from(local_dir),
            target: remote_target.to_string(),
            message: "远端不可达".to_string(),
        })
    }
}
