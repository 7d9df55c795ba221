//! 分片拉取：生成 Range 请求头并发起单段 GET 请求。

use reqwest::header::{CONTENT_RANGE, HeaderMap, RANGE};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::internal::split_download::structs::{DownloadError, Segment};

/// 生成单个 Range 请求头：`bytes=start-end`，end 为含上界。
pub fn range_header(segment: &Segment) -> String {
    format!("bytes={}-{}", segment.start_byte, segment.end_byte)
}

/// 发起 Range 请求时的参数。
pub struct FetchRangeParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub segment: &'a Segment,
}

/// 发起单段 Range GET 请求，返回响应供调用方做 `bytes_stream()`。
pub async fn fetch_range_response(
    params: FetchRangeParams<'_>,
) -> Result<Response, DownloadError> {
    let index = params.segment.index;
    let resp = params
        .client
        .get(params.url.clone())
        .header(RANGE, range_header(params.segment))
        .send()
        .await
        .map_err(|source| DownloadError::Network { index, source })?;

    check_range_status(params.segment, resp.status(), resp.headers())?;
    Ok(resp)
}

/// 206 必须带上与请求一致的 `Content-Range`；200 说明服务器忽略了 Range，交给后续长度校验判断是否恰好就是这一段。
fn check_range_status(
    segment: &Segment,
    status: StatusCode,
    headers: &HeaderMap,
) -> Result<(), DownloadError> {
    match status {
        StatusCode::PARTIAL_CONTENT => {
            let got = headers.get(CONTENT_RANGE).and_then(|v| v.to_str().ok());
            match got.and_then(parse_content_range) {
                Some((start, end)) if start == segment.start_byte && end == segment.end_byte => {
                    Ok(())
                }
                _ => Err(DownloadError::RangeMismatch {
                    index: segment.index,
                    expected: format!("{}-{}", segment.start_byte, segment.end_byte),
                    got: got.unwrap_or("<missing>").to_string(),
                }),
            }
        }
        StatusCode::OK => Ok(()),
        status => Err(DownloadError::UnexpectedStatus {
            index: segment.index,
            status,
        }),
    }
}

/// 解析 `bytes <start>-<end>/<total>`，总长可以是 `*`。
pub fn parse_content_range(value: &str) -> Option<(u64, u64)> {
    let (span, _total) = value.trim().strip_prefix("bytes ")?.split_once('/')?;
    let (start, end) = span.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}
