// Dev utility: create the master-data schema and seed the reference catalogue
// (suppliers / products / replenishment rules) for local runs.
//
// Usage:
//   cargo run --bin seed_master_data -- [db_path]
//
// Existing rows are replaced; config_kv is left untouched.

use replenish_engine::config::default_master_db_path;
use replenish_engine::db::{init_master_schema, open_sqlite_connection};
use rusqlite::params;
use std::error::Error;
use std::fs;
use std::path::Path;

const SUPPLIERS: &[(&str, &str, &str)] = &[
    ("SUP-001", "Les Eaux Minérales d'Oulmès", "Casablanca"),
    ("SUP-002", "Centrale Danone", "Casablanca"),
    ("SUP-003", "Dari Couspate", "Salé"),
    ("SUP-004", "Cosumar", "Casablanca"),
    ("SUP-005", "Dislog Group", "Casablanca"),
];

// sku, name, price, supplier_id, safety_stock, moq
const PRODUCTS: &[(&str, &str, f64, &str, i64, i64)] = &[
    ("PRD-001", "Sidi Ali 1.5L", 6.50, "SUP-001", 100, 50),
    ("PRD-002", "Oulmes 1L", 7.00, "SUP-001", 80, 40),
    ("PRD-003", "Couscous Dari 1kg", 13.50, "SUP-003", 50, 20),
    ("PRD-004", "Thé Sultan Vert", 18.00, "SUP-004", 60, 20),
    ("PRD-005", "Aicha Confiture Fraise", 22.00, "SUP-005", 30, 10),
    ("PRD-006", "Lait Centrale Danone", 3.50, "SUP-002", 200, 100),
    ("PRD-007", "Raibi Jamila", 2.50, "SUP-002", 250, 100),
    ("PRD-008", "Huile d'Olive Al Horra", 65.00, "SUP-005", 20, 10),
    ("PRD-009", "Fromage La Vache Qui Rit", 15.00, "SUP-005", 40, 20),
    ("PRD-010", "Merendina", 2.00, "SUP-005", 300, 50),
    ("PRD-011", "Pasta Tria", 8.00, "SUP-003", 60, 20),
    ("PRD-012", "Sardines Titus", 5.50, "SUP-005", 80, 20),
    ("PRD-013", "Coca-Cola 1L", 9.00, "SUP-005", 150, 30),
    ("PRD-014", "Atay Sebou", 14.00, "SUP-004", 50, 10),
    ("PRD-015", "Eau Ciel 5L", 12.00, "SUP-005", 40, 10),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(default_master_db_path);

    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut conn = open_sqlite_connection(&db_path)?;
    init_master_schema(&conn)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM replenishment_rules", [])?;
    tx.execute("DELETE FROM products", [])?;
    tx.execute("DELETE FROM suppliers", [])?;

    for (supplier_id, name, city) in SUPPLIERS {
        tx.execute(
            "INSERT INTO suppliers (supplier_id, name, city) VALUES (?1, ?2, ?3)",
            params![supplier_id, name, city],
        )?;
    }
    for (sku, name, price, supplier_id, safety_stock, moq) in PRODUCTS {
        tx.execute(
            "INSERT INTO products (sku, name, price, supplier_id) VALUES (?1, ?2, ?3, ?4)",
            params![sku, name, price, supplier_id],
        )?;
        tx.execute(
            "INSERT INTO replenishment_rules (sku, safety_stock, moq) VALUES (?1, ?2, ?3)",
            params![sku, safety_stock, moq],
        )?;
    }
    tx.commit()?;

    println!(
        "seeded {} suppliers, {} products into {}",
        SUPPLIERS.len(),
        PRODUCTS.len(),
        db_path
    );
    Ok(())
}
