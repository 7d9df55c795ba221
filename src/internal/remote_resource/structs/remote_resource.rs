use url::Url;

/// 探测得到的远程资源，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    pub url: Url,
    /// 资源总字节数（来自 `Content-Length`）
    pub total_length: u64,
    /// 服务器是否声明支持 `Range: bytes`；探测成功时恒为 true
    pub supports_ranges: bool,
    /// URL 路径最后一段（已解码），用作默认保存文件名
    pub file_name: String,
}
