//! 分片拉取：单段 Range 下载，请求后流式写入独占的临时文件并更新进度。
//!
//! 在发请求前、等待响应头时、每读一块数据前检查取消信号。
//! 文件与连接都随作用域释放，任何退出路径都不残留句柄；失败时留下的半截文件由临时目录统一清理。

use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::internal::split_download::structs::{DownloadError, Segment};
use crate::internal::states::progress_state::ProgressState;

use super::range_request::{FetchRangeParams, fetch_range_response};

/// 拉取单个分片的参数；每个任务独占一份。
pub struct FetchSegmentParams {
    pub client: Client,
    pub url: Url,
    pub segment: Segment,
    pub cancel: CancellationToken,
    pub progress: ProgressState,
}

/// 拉取一个分片到 `segment.storage_path`；写入字节数必须与规划的区间长度一致。
pub async fn fetch_one_segment(params: FetchSegmentParams) -> Result<(), DownloadError> {
    let FetchSegmentParams {
        client,
        url,
        segment,
        cancel,
        progress,
    } = params;

    if cancel.is_cancelled() {
        return Err(DownloadError::Cancelled);
    }

    debug!(
        index = segment.index,
        start = segment.start_byte,
        end = segment.end_byte,
        "分片开始拉取"
    );

    let resp = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
        resp = fetch_range_response(FetchRangeParams {
            client: &client,
            url: &url,
            segment: &segment,
        }) => resp?,
    };

    let file = File::create(&segment.storage_path)
        .await
        .map_err(|source| DownloadError::CreateSegmentFile {
            index: segment.index,
            source,
        })?;
    let mut writer = BufWriter::new(file);
    let mut stream = resp.bytes_stream();
    let expected = segment.byte_len();
    let mut written: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DownloadError::Cancelled),
            next = stream.next() => next,
        };

        let Some(chunk) = next else { break };
        let chunk = chunk.map_err(|source| DownloadError::Network {
            index: segment.index,
            source,
        })?;

        written += chunk.len() as u64;
        if written > expected {
            return Err(DownloadError::SegmentLength {
                index: segment.index,
                expected,
                actual: written,
            });
        }

        write_chunk(&mut writer, &segment, &chunk).await?;
        progress.advance(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|source| DownloadError::WriteSegmentFile {
            index: segment.index,
            source,
        })?;

    if written != expected {
        return Err(DownloadError::SegmentLength {
            index: segment.index,
            expected,
            actual: written,
        });
    }

    debug!(index = segment.index, bytes = written, "分片拉取完成");
    Ok(())
}

async fn write_chunk(
    writer: &mut BufWriter<File>,
    segment: &Segment,
    chunk: &Bytes,
) -> Result<(), DownloadError> {
    writer
        .write_all(chunk)
        .await
        .map_err(|source| DownloadError::WriteSegmentFile {
            index: segment.index,
            source,
        })
}
