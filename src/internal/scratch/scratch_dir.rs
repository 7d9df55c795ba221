//! 分片临时目录：每次下载独占一个，下载结束（无论成败）后删除。

use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use crate::internal::split_download::structs::{DownloadError, SCRATCH_DIR_PREFIX};

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// 在 `parent`（未指定时为系统临时目录）下创建带前缀的临时目录。
    pub fn create(parent: Option<&Path>) -> Result<Self, DownloadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_DIR_PREFIX);

        let dir = match parent {
            Some(p) => builder.tempdir_in(p),
            None => builder.tempdir(),
        }
        .map_err(DownloadError::CreateScratch)?;

        debug!(path = %dir.path().display(), "临时目录已创建");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 显式删除目录并返回删除结果；直接 drop 也会删除，但会吞掉错误。
    pub fn close(self) -> Result<(), DownloadError> {
        self.dir.close().map_err(DownloadError::RemoveScratch)
    }
}
