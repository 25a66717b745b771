// ==========================================
// 补货需求引擎 - 输出层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 本地批次输出错误
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("输出目录无法清理 ({path}): {message}")]
    OutputAreaNotClearable { path: PathBuf, message: String },

    #[error("批次写入失败 ({path}): {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("批次序列化失败: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("输出目录未处于写入中状态: {0}")]
    NotCommittable(PathBuf),
}

/// 远端传输错误（不影响本地产物有效性）
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("远端目录清理失败 ({target}): {message}")]
    CleanupFailed { target: String, message: String },

    #[error("产物复制失败 ({source_path} → {target}): {message}")]
    CopyFailed {
        source_path: PathBuf,
        target: String,
        message: String,
    },

    #[error("本地产物目录不可读 ({path}): {message}")]
    LocalArtifactsUnreadable { path: PathBuf, message: String },
}

/// Result 类型别名
pub type OutputResult<T> = Result<T, OutputError>;
