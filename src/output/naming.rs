// ==========================================
// 补货需求引擎 - 产物命名
// ==========================================
// 文件名: Order_<编码后的供应商名>_<YYYY-MM-DD>.json
// 编码规则（单射，不同供应商不会撞名）:
//   [A-Za-z0-9.-] 原样保留, 空格 → '_', 其余字节 → %XX
// ==========================================

use chrono::NaiveDate;

pub const IN_PROGRESS_MARKER: &str = "_IN_PROGRESS";
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// 日期对应的输出目录名
pub fn date_dir_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 供应商名称编码
pub fn encode_supplier_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' => encoded.push(byte as char),
            b' ' => encoded.push('_'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// 批次文件名
pub fn artifact_file_name(supplier_name: &str, date: NaiveDate) -> String {
    format!(
        "Order_{}_{}.json",
        encode_supplier_name(supplier_name),
        date_dir_name(date)
    )
}
