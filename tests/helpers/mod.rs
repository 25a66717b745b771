// ==========================================
// 集成测试公共辅助
// ==========================================
// fakes:    内存版主数据 / 事实存储 / 传输（可注入故障）
// fixtures: 真实目录布局与 SQLite 主库的测试数据
// ==========================================

#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use chrono::NaiveDate;

/// 测试统一处理日期
pub fn processing_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 8).unwrap()
}
