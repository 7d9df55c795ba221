//! 资源探测：HEAD 请求确认服务器支持 Range 并给出确定的资源长度。

use percent_encoding::percent_decode_str;
use reqwest::Client;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, HeaderMap};
use tracing::{debug, info};
use url::Url;

use crate::internal::split_download::structs::DownloadError;

use super::structs::RemoteResource;

/// URL 路径没有可用文件名时的兜底名称
pub const DEFAULT_FILE_NAME: &str = "download";

/// 发起一次 HEAD 请求并解析为 [`RemoteResource`]。
pub async fn probe(client: &Client, url: &Url) -> Result<RemoteResource, DownloadError> {
    let resp = client.head(url.clone()).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DownloadError::ProbeStatus(status));
    }

    let resource = resource_from_headers(url, resp.headers())?;
    info!(
        url = %resource.url,
        total_length = resource.total_length,
        file_name = %resource.file_name,
        "资源探测完成"
    );
    Ok(resource)
}

/// 从 HEAD 响应头解析资源信息。
///
/// `reqwest::Response::content_length` 对 HEAD 响应取的是空 body 的长度，这里直接读 `Content-Length` 头。
pub fn resource_from_headers(
    url: &Url,
    headers: &HeaderMap,
) -> Result<RemoteResource, DownloadError> {
    if !advertises_byte_ranges(headers) {
        debug!(accept_ranges = ?headers.get(ACCEPT_RANGES), "未声明 bytes 范围支持");
        return Err(DownloadError::CapabilityUnsupported);
    }

    let total_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or(DownloadError::UnknownLength)?;

    Ok(RemoteResource {
        url: url.clone(),
        total_length,
        supports_ranges: true,
        file_name: file_name_from_url(url),
    })
}

/// `Accept-Ranges` 中含有 `bytes` 单位；缺失或为 `none` 都视为不支持。
fn advertises_byte_ranges(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT_RANGES)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
}

/// 取 URL 路径的最后一个非空段并做百分号解码；解码后的路径分隔符替换为 `_`。
pub fn file_name_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|raw| {
            percent_decode_str(raw)
                .decode_utf8_lossy()
                .replace(['/', '\\'], "_")
        })
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
}
