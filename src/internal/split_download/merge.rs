//! 分片合并：按 `index` 升序把各分片文件拼接为目标文件。
//!
//! 先写入目标旁的暂存文件 `.{name}.part`，长度校验通过后再 rename 到目标路径；
//! 任何失败都会删除暂存文件，目标路径保持原样。

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::internal::split_download::structs::{DownloadError, DownloadPlan};

pub struct MergeParams<'a> {
    pub plan: &'a DownloadPlan,
    pub destination: &'a Path,
    /// 合并每个分片前检查，拷贝过程中也会响应
    pub interrupt: &'a CancellationToken,
}

/// 合并全部分片，返回写入目标文件的字节数。
///
/// 前提：拉取阶段已无错误结束，每个分片文件恰好包含规划的区间。
pub async fn merge_segments(params: MergeParams<'_>) -> Result<u64, DownloadError> {
    let staging = staging_path(params.destination)?;

    let written = match write_staging(params.plan, &staging, params.interrupt).await {
        Ok(n) => n,
        Err(e) => {
            remove_staging(&staging).await;
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&staging, params.destination).await {
        remove_staging(&staging).await;
        return Err(DownloadError::FinalizeDestination(e));
    }

    info!(
        destination = %params.destination.display(),
        bytes = written,
        segments = params.plan.len(),
        "分片合并完成"
    );
    Ok(written)
}

/// 与目标同目录的暂存文件，保证 rename 不跨文件系统。
pub fn staging_path(destination: &Path) -> Result<PathBuf, DownloadError> {
    let name = destination
        .file_name()
        .ok_or_else(|| DownloadError::InvalidDestination(destination.to_path_buf()))?;

    let mut staged = std::ffi::OsString::from(".");
    staged.push(name);
    staged.push(".part");
    Ok(destination.with_file_name(staged))
}

async fn write_staging(
    plan: &DownloadPlan,
    staging: &Path,
    interrupt: &CancellationToken,
) -> Result<u64, DownloadError> {
    let file = File::create(staging)
        .await
        .map_err(DownloadError::CreateDestination)?;
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;

    for segment in plan.segments() {
        if interrupt.is_cancelled() {
            return Err(DownloadError::Interrupted);
        }

        let mut source = File::open(&segment.storage_path).await.map_err(|source| {
            DownloadError::ReadSegmentFile {
                index: segment.index,
                source,
            }
        })?;

        let copied = tokio::select! {
            biased;
            _ = interrupt.cancelled() => return Err(DownloadError::Interrupted),
            copied = tokio::io::copy(&mut source, &mut writer) => copied,
        };
        written += copied.map_err(|source| DownloadError::MergeSegment {
            index: segment.index,
            source,
        })?;
    }

    writer
        .flush()
        .await
        .map_err(DownloadError::WriteDestination)?;
    writer
        .into_inner()
        .sync_all()
        .await
        .map_err(DownloadError::WriteDestination)?;

    if written != plan.total_length() {
        return Err(DownloadError::MergedLength {
            expected: plan.total_length(),
            actual: written,
        });
    }

    Ok(written)
}

async fn remove_staging(staging: &Path) {
    if let Err(e) = fs::remove_file(staging).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %staging.display(), error = %e, "删除暂存文件失败");
        }
    }
}
