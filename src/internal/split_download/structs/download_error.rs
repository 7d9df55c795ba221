//! 分片下载相关错误类型。

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("缺少参数：需要提供资源 URL")]
    MissingArgument,

    #[error("URL 无效: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("保存路径无效: {}", .0.display())]
    InvalidDestination(PathBuf),

    /// 探测阶段的传输失败，或构建 HTTP 客户端失败。
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("探测请求返回异常状态: {0}")]
    ProbeStatus(StatusCode),

    #[error("服务器不支持 Range 请求")]
    CapabilityUnsupported,

    #[error("无法确定资源长度")]
    UnknownLength,

    #[error("分片 {index} 网络错误: {source}")]
    Network {
        index: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("分片 {index} 返回异常状态: {status}")]
    UnexpectedStatus { index: usize, status: StatusCode },

    #[error("分片 {index} 返回的区间不符：请求 {expected}，Content-Range 为 {got}")]
    RangeMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("分片 {index} 长度不符：期望 {expected} 字节，实际 {actual} 字节")]
    SegmentLength {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("下载超时（{0:?}）")]
    Timeout(Duration),

    #[error("检测到中断")]
    Interrupted,

    #[error("下载被取消")]
    Cancelled,

    #[error("分片任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("创建临时目录失败: {0}")]
    CreateScratch(std::io::Error),

    #[error("删除临时目录失败: {0}")]
    RemoveScratch(std::io::Error),

    #[error("创建分片文件 {index} 失败: {source}")]
    CreateSegmentFile {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("写入分片文件 {index} 失败: {source}")]
    WriteSegmentFile {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("读取分片文件 {index} 失败: {source}")]
    ReadSegmentFile {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("合并分片 {index} 失败: {source}")]
    MergeSegment {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("创建目标文件失败: {0}")]
    CreateDestination(std::io::Error),

    #[error("写入目标文件失败: {0}")]
    WriteDestination(std::io::Error),

    #[error("落盘目标文件失败: {0}")]
    FinalizeDestination(std::io::Error),

    #[error("合并结果长度不符：期望 {expected} 字节，实际 {actual} 字节")]
    MergedLength { expected: u64, actual: u64 },
}

/// 错误分类，对应对外暴露的错误语义（调用方按类别处理，不必逐个匹配变体）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    MissingArgument,
    InvalidInput,
    CapabilityUnsupported,
    UnknownLength,
    NetworkError,
    Timeout,
    Interrupted,
    Cancelled,
    IoError,
    Internal,
}

impl DownloadError {
    pub fn kind(&self) -> DownloadErrorKind {
        use DownloadError::*;
        match self {
            MissingArgument => DownloadErrorKind::MissingArgument,
            InvalidUrl(_) | InvalidConfig(_) | InvalidDestination(_) => {
                DownloadErrorKind::InvalidInput
            }
            CapabilityUnsupported => DownloadErrorKind::CapabilityUnsupported,
            UnknownLength => DownloadErrorKind::UnknownLength,
            Request(_)
            | ProbeStatus(_)
            | Network { .. }
            | UnexpectedStatus { .. }
            | RangeMismatch { .. }
            | SegmentLength { .. } => DownloadErrorKind::NetworkError,
            Timeout(_) => DownloadErrorKind::Timeout,
            Interrupted => DownloadErrorKind::Interrupted,
            Cancelled => DownloadErrorKind::Cancelled,
            TaskJoin(_) => DownloadErrorKind::Internal,
            CreateScratch(_)
            | RemoveScratch(_)
            | CreateSegmentFile { .. }
            | WriteSegmentFile { .. }
            | ReadSegmentFile { .. }
            | MergeSegment { .. }
            | CreateDestination(_)
            | WriteDestination(_)
            | FinalizeDestination(_)
            | MergedLength { .. } => DownloadErrorKind::IoError,
        }
    }
}
