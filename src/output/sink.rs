// ==========================================
// 补货需求引擎 - 批次输出 (OutputSink)
// ==========================================
// 单日输出目录的生命周期:
//   begin   → 整体清空目录（失败即中止，不写任何文件）+ 写 _IN_PROGRESS
//   write   → 每个供应商一个 JSON 文件
//   commit  → 删除 _IN_PROGRESS，写 _SUCCESS
//   abort   → 删除整个目录（不留部分批次）
// 约束: 同一日期不可并发运行（清空步骤具有破坏性）
// ==========================================

use super::error::{OutputError, OutputResult};
use super::naming::{artifact_file_name, date_dir_name, IN_PROGRESS_MARKER, SUCCESS_MARKER};
use crate::domain::order::SupplierOrderBatch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// 输出目录状态（供外部调度器判断是否需要重跑）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputAreaStatus {
    Absent,     // 从未输出
    Incomplete, // 已清空但未提交（运行中或中途崩溃）
    Committed,  // 已完整提交
}

// ==========================================
// OutputSink Trait
// ==========================================
pub trait OutputSink: Send + Sync {
    /// 获取并清空某日输出目录
    fn begin(&self, date: NaiveDate, run_id: &str) -> OutputResult<PathBuf>;

    /// 写出单个批次，返回产物位置
    fn write(&self, batch: &SupplierOrderBatch) -> OutputResult<PathBuf>;

    /// 提交某日输出
    fn commit(&self, date: NaiveDate) -> OutputResult<PathBuf>;

    /// 放弃某日输出（尽力而为）
    fn abort(&self, date: NaiveDate);

    /// 查询某日输出目录状态
    fn inspect(&self, date: NaiveDate) -> OutputResult<OutputAreaStatus>;

    /// 某日输出目录位置
    fn area_location(&self, date: NaiveDate) -> PathBuf;
}

// ==========================================
// OutputTransaction - 作用域化的输出事务
// ==========================================
// 未 commit 即 drop 时自动 abort
pub struct OutputTransaction<'a, S>
where
    S: OutputSink + ?Sized,
{
    sink: &'a S,
    date: NaiveDate,
    written: Vec<PathBuf>,
    committed: bool,
}

impl<'a, S> OutputTransaction<'a, S>
where
    S: OutputSink + ?Sized,
{
    pub fn begin(sink: &'a S, date: NaiveDate, run_id: &str) -> OutputResult<Self> {
        sink.begin(date, run_id)?;
        Ok(Self {
            sink,
            date,
            written: Vec::new(),
            committed: false,
        })
    }

    pub fn write(&mut self, batch: &SupplierOrderBatch) -> OutputResult<PathBuf> {
        let location = self.sink.write(batch)?;
        self.written.push(location.clone());
        Ok(location)
    }

    /// 提交并返回已写出的产物位置
    pub fn commit(mut self) -> OutputResult<Vec<PathBuf>> {
        self.sink.commit(self.date)?;
        self.committed = true;
        Ok(std::mem::take(&mut self.written))
    }
}

impl<S> Drop for OutputTransaction<'_, S>
where
    S: OutputSink + ?Sized,
{
    fn drop(&mut self) {
        if !self.committed {
            warn!(date = %self.date, written = self.written.len(), "输出事务未提交，回滚");
            self.sink.abort(self.date);
        }
    }
}

// ==========================================
// LocalDirectorySink - 本地目录输出
// ==========================================
pub struct LocalDirectorySink {
    root: PathBuf,
}

impl LocalDirectorySink {
    /// # 参数
    /// - root: 输出根目录（每日一个子目录）
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_file(path: &Path, content: &[u8]) -> OutputResult<()> {
        fs::write(path, content).map_err(|e| OutputError::WriteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl OutputSink for LocalDirectorySink {
    fn begin(&self, date: NaiveDate, run_id: &str) -> OutputResult<PathBuf> {
        let area = self.area_location(date);
        let not_clearable = |e: std::io::Error| OutputError::OutputAreaNotClearable {
            path: area.clone(),
            message: e.to_string(),
        };

        match fs::remove_dir_all(&area) {
            Ok(()) => debug!(path = %area.display(), "已清空旧输出目录"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(not_clearable(e)),
        }
        fs::create_dir_all(&area).map_err(not_clearable)?;
        Self::write_file(&area.join(IN_PROGRESS_MARKER), run_id.as_bytes())?;

        info!(date = %date, path = %area.display(), run_id, "输出目录已获取");
        Ok(area)
    }

    fn write(&self, batch: &SupplierOrderBatch) -> OutputResult<PathBuf> {
        let area = self.area_location(batch.processing_date);
        if !area.join(IN_PROGRESS_MARKER).is_file() {
            return Err(OutputError::NotCommittable(area));
        }

        let path = area.join(artifact_file_name(&batch.supplier_name, batch.processing_date));
        let mut content = serde_json::to_vec_pretty(batch)?;
        content.push(b'\n');
        Self::write_file(&path, &content)?;

        debug!(
            supplier = %batch.supplier_name,
            line_count = batch.lines.len(),
            path = %path.display(),
            "批次已写出"
        );
        Ok(path)
    }

    fn commit(&self, date: NaiveDate) -> OutputResult<PathBuf> {
        let area = self.area_location(date);
        let marker = area.join(IN_PROGRESS_MARKER);
        if !marker.is_file() {
            return Err(OutputError::NotCommittable(area));
        }

        Self::write_file(&area.join(SUCCESS_MARKER), b"")?;
        fs::remove_file(&marker).map_err(|e| OutputError::WriteFailed {
            path: marker.clone(),
            message: e.to_string(),
        })?;

        info!(date = %date, path = %area.display(), "输出已提交");
        Ok(area)
    }

    fn abort(&self, date: NaiveDate) {
        let area = self.area_location(date);
        match fs::remove_dir_all(&area) {
            Ok(()) => info!(date = %date, "已回滚输出目录"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!(
                date = %date,
                path = %area.display(),
                error = %e,
                "输出目录回滚失败，目录保持未提交状态"
            ),
        }
    }

    fn inspect(&self, date: NaiveDate) -> OutputResult<OutputAreaStatus> {
        let area = self.area_location(date);
        if !area.is_dir() {
            return Ok(OutputAreaStatus::Absent);
        }
        let committed = area.join(SUCCESS_MARKER).is_file() && !area.join(IN_PROGRESS_MARKER).exists();
        Ok(if committed {
            OutputAreaStatus::Committed
        } else {
            OutputAreaStatus::Incomplete
        })
    }

    fn area_location(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date_dir_name(date))
    }
}
