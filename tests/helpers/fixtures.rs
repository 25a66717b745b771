// ==========================================
// 测试数据落地 - 用于端到端测试
// ==========================================
// 事实目录: <root>/orders/dt=../store_id=../*.json, <root>/inventory/dt=../*.csv
// 主数据: SQLite 主库（suppliers / products / replenishment_rules / config_kv）
// ==========================================

use chrono::NaiveDate;
use replenish_engine::db::{init_master_schema, open_sqlite_connection};
use replenish_engine::domain::RawOrder;
use rusqlite::params;
use std::fs;
use std::path::{Path, PathBuf};

/// 主数据种子行: (sku, 商品名, 供应商编码, 安全库存, MOQ)
pub type ProductSeed<'a> = (&'a str, &'a str, &'a str, i64, i64);

/// 创建并填充 SQLite 主库
pub fn seed_master_db(db_path: &Path, suppliers: &[(&str, &str)], products: &[ProductSeed<'_>]) {
    let conn = open_sqlite_connection(db_path.to_str().unwrap()).unwrap();
    init_master_schema(&conn).unwrap();

    for (supplier_id, name) in suppliers {
        conn.execute(
            "INSERT INTO suppliers (supplier_id, name) VALUES (?1, ?2)",
            params![supplier_id, name],
        )
        .unwrap();
    }
    for (sku, name, supplier_id, safety_stock, moq) in products {
        conn.execute(
            "INSERT INTO products (sku, name, price, supplier_id) VALUES (?1, ?2, 1.0, ?3)",
            params![sku, name, supplier_id],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO replenishment_rules (sku, safety_stock, moq) VALUES (?1, ?2, ?3)",
            params![sku, safety_stock, moq],
        )
        .unwrap();
    }
}

/// 写入全局配置项
pub fn put_global_config(db_path: &Path, key: &str, value: &str) {
    let conn = open_sqlite_connection(db_path.to_str().unwrap()).unwrap();
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )
    .unwrap();
}

/// 写出一个门店分区的订单文件（NDJSON）
pub fn write_orders(
    fact_root: &Path,
    date: NaiveDate,
    store_id: &str,
    file_name: &str,
    orders: &[RawOrder],
) -> PathBuf {
    let dir = fact_root
        .join("orders")
        .join(format!("dt={}", date))
        .join(format!("store_id={}", store_id));
    fs::create_dir_all(&dir).unwrap();

    let mut content = String::new();
    for order in orders {
        content.push_str(&serde_json::to_string(order).unwrap());
        content.push('\n');
    }
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

/// 写出一个日期分区的库存文件（CSV）: rows 为 (仓库, sku, 可用, 预留)
pub fn write_inventory(
    fact_root: &Path,
    date: NaiveDate,
    file_name: &str,
    rows: &[(&str, &str, i64, i64)],
) -> PathBuf {
    let dir = fact_root.join("inventory").join(format!("dt={}", date));
    fs::create_dir_all(&dir).unwrap();

    let mut content = String::from("warehouse_id,sku,available_qty,reserved_qty\n");
    for (warehouse_id, sku, available, reserved) in rows {
        content.push_str(&format!("{},{},{},{}\n", warehouse_id, sku, available, reserved));
    }
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

/// 目录下的文件名（有序）
pub fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// 读取批次文件为 JSON
pub fn read_batch_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
