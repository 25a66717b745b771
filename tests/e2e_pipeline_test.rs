// ==========================================
// 补货需求引擎 - 端到端流程测试
// ==========================================
// SQLite 主库 + Hive 目录事实存储 + 本地目录输出 + 镜像发布
// 流程: 配置加载 → 运行 → 产物校验 → 发布
// ==========================================

mod helpers;

use helpers::fakes::order;
use helpers::fixtures::{
    list_file_names, put_global_config, read_batch_json, seed_master_db, write_inventory,
    write_orders,
};
use helpers::processing_date;
use replenish_engine::config::{config_keys, ConfigManager, EngineConfig, LogFormat};
use replenish_engine::engine::PublishOutcome;
use replenish_engine::output::{artifact_file_name, LocalMirrorTransport};
use replenish_engine::repository::FactTable;
use replenish_engine::{
    logging, EngineError, LocalDirectorySink, PartitionedFileFactStore, ReplenishmentEngine,
    RunState, SqliteMasterDataRepository,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const OULMES: &str = "Les Eaux Minérales d'Oulmès";

/// 主数据:
/// - PRD-001 Sidi Ali 1.5L        Oulmès  safety=100 moq=50
/// - PRD-002 Oulmes 1L            Oulmès  safety=80  moq=40
/// - PRD-006 Lait Centrale Danone Danone  safety=200 moq=100
fn seed_catalogue(db_path: &Path) {
    seed_master_db(
        db_path,
        &[("SUP-001", OULMES), ("SUP-002", "Centrale Danone")],
        &[
            ("PRD-001", "Sidi Ali 1.5L", "SUP-001", 100, 50),
            ("PRD-002", "Oulmes 1L", "SUP-001", 80, 40),
            ("PRD-006", "Lait Centrale Danone", "SUP-002", 200, 100),
        ],
    );
}

/// 事实:
/// - 当日两家门店: PRD-001 售 30+20, PRD-006 售 20
/// - 前一日分区: PRD-002 售 999（不应计入）
/// - 当日库存: PRD-001 60, PRD-006 500/50, PRD-002 100
fn seed_facts(fact_root: &Path) {
    let date = processing_date();
    let previous_day = date.pred_opt().unwrap();

    write_orders(
        fact_root,
        date,
        "S01",
        "part-0000.json",
        &[order("S01-0001", &[("PRD-001", 30), ("PRD-006", 20)])],
    );
    write_orders(
        fact_root,
        date,
        "S02",
        "part-0000.json",
        &[order("S02-0001", &[("PRD-001", 20)])],
    );
    write_orders(
        fact_root,
        previous_day,
        "S01",
        "part-0000.json",
        &[order("S01-0000", &[("PRD-002", 999)])],
    );
    write_inventory(
        fact_root,
        date,
        "stock.csv",
        &[
            ("WH-CASA", "PRD-001", 60, 0),
            ("WH-CASA", "PRD-006", 500, 50),
            ("WH-CASA", "PRD-002", 100, 0),
        ],
    );
}

fn load_config(db_path: &Path, env: &HashMap<String, String>) -> EngineConfig {
    let db_path = db_path.to_str().unwrap().to_string();
    let kv = ConfigManager::new(&db_path).unwrap().load_global().unwrap();
    EngineConfig::from_layers(db_path, &kv, env)
}

// ==========================================
// 场景1: 完整流程（配置 → 运行 → 发布）
// ==========================================

#[tokio::test]
async fn test_e2e_full_pipeline_with_publish() {
    logging::init_test();
    let workspace = TempDir::new().unwrap();
    let db_path = workspace.path().join("procurement.db");
    let fact_root = workspace.path().join("lake");
    let output_root = workspace.path().join("out");
    let remote_root = workspace.path().join("remote");
    let date = processing_date();

    seed_catalogue(&db_path);
    seed_facts(&fact_root);
    put_global_config(&db_path, config_keys::FACT_ROOT, fact_root.to_str().unwrap());
    put_global_config(&db_path, config_keys::ORIGIN_TAG, "Computed via nightly batch");
    put_global_config(&db_path, config_keys::OUTPUT_ROOT, "/should/be/overridden");
    println!("✓ 步骤1: 主库与事实目录准备完成");

    let env = HashMap::from([
        (config_keys::ENV_OUTPUT_ROOT.to_string(), output_root.display().to_string()),
        (config_keys::ENV_REMOTE_ROOT.to_string(), remote_root.display().to_string()),
    ]);
    let config = load_config(&db_path, &env);
    assert_eq!(config.fact_root, fact_root, "config_kv 覆盖默认值");
    assert_eq!(config.output_root, output_root, "环境变量覆盖 config_kv");
    assert_eq!(config.origin_tag, "Computed via nightly batch");
    assert_eq!(config.log_format, LogFormat::Text);
    println!("✓ 步骤2: 配置分层加载正确");

    let engine = ReplenishmentEngine::new(
        Arc::new(SqliteMasterDataRepository::new(&config.master_db_path)),
        Arc::new(PartitionedFileFactStore::new(&config.fact_root)),
        Arc::new(LocalDirectorySink::new(&config.output_root)),
        config.origin_tag.clone(),
    );
    let transport = LocalMirrorTransport::new(config.remote_root.as_ref().unwrap());
    let report = engine.run_and_publish(date, &transport).await.unwrap();

    assert_eq!(report.final_state(), Some(RunState::Done));
    assert_eq!(report.master_sku_count, 3);
    assert_eq!(report.zero_demand_count, 2, "PRD-002 / PRD-006 库存充足");
    assert_eq!(report.line_count, 1);
    println!("✓ 步骤3: 运行完成");

    let file_name = artifact_file_name(OULMES, date);
    assert_eq!(file_name, "Order_Les_Eaux_Min%C3%A9rales_d%27Oulm%C3%A8s_2026-01-08.json");
    let area = output_root.join("2026-01-08");
    assert_eq!(list_file_names(&area), vec![file_name.clone(), "_SUCCESS".to_string()]);

    let batch = read_batch_json(&area.join(&file_name));
    assert_eq!(batch["supplier"], OULMES);
    assert_eq!(batch["origin"], "Computed via nightly batch");
    assert_eq!(batch["items"].as_array().unwrap().len(), 1);
    assert_eq!(batch["items"][0]["sku"], "PRD-001");
    assert_eq!(batch["items"][0]["product"], "Sidi Ali 1.5L");
    assert_eq!(
        batch["items"][0]["net_demand"], 90,
        "售 50 + 安全 100 - 可售 60，前一日分区不计入"
    );
    assert_eq!(batch["items"][0]["final_order_quantity"], 90);
    println!("✓ 步骤4: 批次文件内容正确");

    assert!(matches!(
        report.publish,
        Some(PublishOutcome::Published { files_copied: 2, .. })
    ));
    assert_eq!(
        list_file_names(&remote_root.join("2026-01-08")),
        list_file_names(&area)
    );
    println!("✓ 步骤5: 远端镜像与本地一致");
}

// ==========================================
// 场景2: 新增分区在下一次运行前被刷新可见
// ==========================================

#[test]
fn test_e2e_new_partition_visible_after_refresh() {
    logging::init_test();
    let workspace = TempDir::new().unwrap();
    let db_path = workspace.path().join("procurement.db");
    let fact_root = workspace.path().join("lake");
    let date = processing_date();

    seed_catalogue(&db_path);
    write_orders(
        &fact_root,
        date,
        "S01",
        "part-0000.json",
        &[order("S01-0001", &[("PRD-001", 30)])],
    );
    write_inventory(
        &fact_root,
        date,
        "stock.csv",
        &[
            ("WH-CASA", "PRD-001", 60, 0),
            ("WH-CASA", "PRD-002", 100, 0),
            ("WH-CASA", "PRD-006", 500, 0),
        ],
    );

    let facts = Arc::new(PartitionedFileFactStore::new(&fact_root));
    let engine = ReplenishmentEngine::new(
        Arc::new(SqliteMasterDataRepository::new(db_path.to_str().unwrap())),
        facts.clone(),
        Arc::new(LocalDirectorySink::new(workspace.path().join("out"))),
        "e2e",
    );

    let first = engine.run(date).unwrap();
    assert_eq!(facts.catalog().partition_count(FactTable::RawOrders).unwrap(), 1);

    // 运行间隙新增门店分区
    write_orders(
        &fact_root,
        date,
        "S02",
        "part-0000.json",
        &[order("S02-0001", &[("PRD-001", 45)])],
    );
    let second = engine.run(date).unwrap();

    assert_eq!(facts.catalog().partition_count(FactTable::RawOrders).unwrap(), 2);
    assert_eq!(first.batches[0].total_order_quantity, 70, "30 + 100 - 60");
    assert_eq!(
        second.batches[0].total_order_quantity, 115,
        "新分区应被计入: 75 + 100 - 60"
    );
}

// ==========================================
// 场景3: 主库不存在
// ==========================================

#[test]
fn test_e2e_missing_master_db_fails_in_loading() {
    logging::init_test();
    let workspace = TempDir::new().unwrap();
    let fact_root = workspace.path().join("lake");
    seed_facts(&fact_root);
    let missing_db = workspace.path().join("missing.db");

    let engine = ReplenishmentEngine::new(
        Arc::new(SqliteMasterDataRepository::new(missing_db.to_str().unwrap())),
        Arc::new(PartitionedFileFactStore::new(&fact_root)),
        Arc::new(LocalDirectorySink::new(workspace.path().join("out"))),
        "e2e",
    );

    let err = engine.run(processing_date()).unwrap_err();

    assert_eq!(err.failed_state(), RunState::LoadingMasterData);
    assert!(matches!(err, EngineError::MasterData(ref e) if e.is_unreachable()));
    assert!(!missing_db.exists(), "只读打开不应创建空库");
    assert!(!workspace.path().join("out").exists(), "失败运行不应产生输出");
}
