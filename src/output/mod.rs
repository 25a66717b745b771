// ==========================================
// 补货需求引擎 - 输出层
// ==========================================
// 职责: 批次文件落盘（本地，唯一持久化副作用）+ 远端发布
// ==========================================

pub mod error;
pub mod naming;
pub mod sink;
pub mod transport;

pub use error::{OutputError, OutputResult, TransportError};
pub use naming::artifact_file_name;
pub use sink::{LocalDirectorySink, OutputAreaStatus, OutputSink, OutputTransaction};
pub use transport::{ArtifactTransport, LocalMirrorTransport, PublishReceipt};
