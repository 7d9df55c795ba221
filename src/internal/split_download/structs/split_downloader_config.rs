use std::path::PathBuf;
use std::time::Duration;

use super::download_error::DownloadError;

/// 默认分片数
pub const DEFAULT_DIVISION_COUNT: usize = 5;

/// 默认整体超时（秒），覆盖全部分片的拉取阶段
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 临时目录名前缀
pub const SCRATCH_DIR_PREFIX: &str = "split-dl";

#[derive(Debug, Clone)]
pub struct SplitDownloaderConfig {
    /// 分片数，同时也是并发请求数
    pub division_count: usize,
    /// 拉取阶段的整体超时；所有分片共享同一个截止时间
    pub timeout: Duration,
    /// 目标文件路径；`None` 时使用当前目录下的资源文件名
    pub save_path: Option<PathBuf>,
    /// 临时目录的父目录；`None` 时使用系统临时目录
    pub scratch_parent: Option<PathBuf>,
}

impl Default for SplitDownloaderConfig {
    fn default() -> Self {
        Self {
            division_count: DEFAULT_DIVISION_COUNT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            save_path: None,
            scratch_parent: None,
        }
    }
}

impl SplitDownloaderConfig {
    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.division_count == 0 {
            return Err(DownloadError::InvalidConfig(
                "division_count 必须大于 0".into(),
            ));
        }
        Ok(())
    }
}
