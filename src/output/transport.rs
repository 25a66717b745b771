// ==========================================
// 补货需求引擎 - 产物远端传输
// ==========================================
// 语义: 先删除远端该日期目录，再完整复制本地产物集
// 约束: 传输失败不影响本地产物有效性，由调用方决定重试
// ==========================================

use super::error::TransportError;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// 发布回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub remote_target: String,
    pub files_copied: usize,
}

// ==========================================
// ArtifactTransport Trait
// ==========================================
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    /// 某日产物的远端目标
    fn remote_target_for(&self, date: NaiveDate) -> String;

    /// 发布本地产物目录到远端目标
    async fn publish(
        &self,
        local_dir: &Path,
        remote_target: &str,
    ) -> Result<PublishReceipt, TransportError>;
}

// ==========================================
// LocalMirrorTransport - 镜像到另一个目录树
// ==========================================
// 远端布局: <remote_root>/<YYYY-MM-DD>/...
pub struct LocalMirrorTransport {
    remote_root: PathBuf,
}

impl LocalMirrorTransport {
    pub fn new<P: AsRef<Path>>(remote_root: P) -> Self {
        Self {
            remote_root: remote_root.as_ref().to_path_buf(),
        }
    }

    async fn list_local_files(local_dir: &Path) -> Result<Vec<PathBuf>, TransportError> {
        let unreadable = |e: std::io::Error| TransportError::LocalArtifactsUnreadable {
            path: local_dir.to_path_buf(),
            message: e.to_string(),
        };

        let mut entries = fs::read_dir(local_dir).await.map_err(unreadable)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
            let file_type = entry.file_type().await.map_err(unreadable)?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl ArtifactTransport for LocalMirrorTransport {
    fn remote_target_for(&self, date: NaiveDate) -> String {
        self.remote_root
            .join(date.format("%Y-%m-%d").to_string())
            .display()
            .to_string()
    }

    async fn publish(
        &self,
        local_dir: &Path,
        remote_target: &str,
    ) -> Result<PublishReceipt, TransportError> {
        let target = PathBuf::from(remote_target);
        let files = Self::list_local_files(local_dir).await?;

        // 1. 清理远端旧目录
        match fs::remove_dir_all(&target).await {
            Ok(()) => info!(target = %remote_target, "已删除远端旧产物"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(TransportError::CleanupFailed {
                    target: remote_target.to_string(),
                    message: e.to_string(),
                })
            }
        }
        fs::create_dir_all(&target)
            .await
            .map_err(|e| TransportError::CleanupFailed {
                target: remote_target.to_string(),
                message: e.to_string(),
            })?;

        // 2. 并发复制本地产物
        let copies = files.iter().map(|file| {
            let dest = file
                .file_name()
                .map(|name| target.join(name))
                .unwrap_or_else(|| target.clone());
            async move {
                fs::copy(file, &dest)
                    .await
                    .map_err(|e| TransportError::CopyFailed {
                        source_path: file.clone(),
                        target: dest.display().to_string(),
                        message: e.to_string(),
                    })
            }
        });
        let copied = try_join_all(copies).await.map_err(|e| {
            warn!(error = %e, "远端发布失败，本地产物保持有效");
            e
        })?;

        info!(
            target = %remote_target,
            files_copied = copied.len(),
            "产物发布完成"
        );
        Ok(PublishReceipt {
            remote_target: remote_target.to_string(),
            files_copied: copied.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 8).unwrap()
    }

    #[tokio::test]
    async fn test_publish_replaces_remote_content() {
        let local = TempDir::new().unwrap();
        let remote = TempDir::new().unwrap();
        std::fs::write(local.path().join("Order_Cosumar_2026-01-08.json"), b"{}").unwrap();
        std::fs::write(local.path().join("_SUCCESS"), b"").unwrap();

        let transport = LocalMirrorTransport::new(remote.path());
        let target = transport.remote_target_for(date());
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(Path::new(&target).join("Order_Stale_2026-01-08.json"), b"{}").unwrap();

        let receipt = transport.publish(local.path(), &target).await.unwrap();

        assert_eq!(receipt.files_copied, 2);
        assert!(!Path::new(&target).join("Order_Stale_2026-01-08.json").exists(), "旧远端文件应被删除");
        assert!(Path::new(&target).join("Order_Cosumar_2026-01-08.json").is_file());
    }

    #[tokio::test]
    async fn test_publish_missing_local_dir_fails() {
        let remote = TempDir::new().unwrap();
        let transport = LocalMirrorTransport::new(remote.path());
        let target = transport.remote_target_for(date());

        let err = transport
            .publish(Path::new("/nonexistent/replenish/2026-01-08"), &target)
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::LocalArtifactsUnreadable { .. }));
    }
}
