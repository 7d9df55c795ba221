//! 分片规划：把资源总长度切成固定数量、首尾相接的字节区间。
//!
//! 纯计算，不访问网络；相同输入总是得到相同输出。

use std::path::Path;

use super::segment::Segment;

/// 一段闭区间 `[start, end]`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

/// 按 `division_count` 等分 `[0, total_length - 1]`，最后一段吸收整除余数并止于 `total_length - 1`。
///
/// `total_length` 小于 `division_count` 时段数降为 `total_length`，保证每段非空；
/// `total_length` 为 0 时返回空列表。`division_count` 为 0 时按 1 处理。
pub fn plan_ranges(total_length: u64, division_count: usize) -> Vec<ByteRange> {
    let division = (division_count.max(1) as u64).min(total_length);
    if division == 0 {
        return Vec::new();
    }

    let base = total_length / division;
    (0..division)
        .map(|i| {
            let start = i * base;
            let end = if i == division - 1 {
                total_length - 1
            } else {
                start + base - 1
            };
            ByteRange { start, end }
        })
        .collect()
}

/// 下载计划：按 `index` 升序排列的分片，构建后只读。
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    total_length: u64,
    segments: Vec<Segment>,
}

impl DownloadPlan {
    /// 规划分片并为每段分配 `storage_dir` 下独立的临时文件：`{index}_{file_name}`。
    pub fn build(
        total_length: u64,
        division_count: usize,
        storage_dir: &Path,
        file_name: &str,
    ) -> Self {
        let segments = plan_ranges(total_length, division_count)
            .into_iter()
            .enumerate()
            .map(|(index, range)| Segment {
                index,
                start_byte: range.start,
                end_byte: range.end,
                storage_path: storage_dir.join(format!("{}_{}", index, file_name)),
            })
            .collect();

        Self {
            total_length,
            segments,
        }
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
