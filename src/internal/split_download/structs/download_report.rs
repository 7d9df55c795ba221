use std::path::PathBuf;
use std::time::Duration;

/// 一次成功下载的结果。
#[derive(Debug, Clone)]
pub struct DownloadReport {
    /// 合并完成后的目标文件
    pub destination: PathBuf,
    pub total_length: u64,
    pub segment_count: usize,
    /// 从拉取开始到合并完成
    pub elapsed: Duration,
}
