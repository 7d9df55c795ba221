use std::path::PathBuf;

/// 单个分片：资源中的一段连续字节（闭区间 `[start_byte, end_byte]`）及其独占的临时文件。
///
/// `index` 从 0 开始，与分片在整体中的先后顺序一致；合并时只按 `index` 排序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub start_byte: u64,
    /// 含上界
    pub end_byte: u64,
    pub storage_path: PathBuf,
}

impl Segment {
    /// 分片字节数（闭区间，至少为 1）。
    pub fn byte_len(&self) -> u64 {
        self.end_byte - self.start_byte + 1
    }
}
