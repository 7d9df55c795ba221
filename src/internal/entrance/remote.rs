use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use crate::internal::remote_resource::probe::probe;
use crate::internal::scratch::scratch_dir::ScratchDir;
use crate::internal::split_download::structs::{
    DownloadError, DownloadJob, DownloadPlan, DownloadReport, RunJobParams,
    SplitDownloaderConfig,
};
use crate::internal::states::progress_state::ProgressState;

/// 分片下载器：探测 → 规划 → 并发拉取 → 合并。
///
/// ```rust,no_run
/// # use split_dl::SplitDownloader;
/// # async fn example() -> Result<(), split_dl::DownloadError> {
/// let report = SplitDownloader::new("https://example.com/files/archive.zip")
///     .division_count(8)
///     .timeout(std::time::Duration::from_secs(60))
///     .save_to("archive.zip")
///     .send()
///     .await?;
/// println!("{} bytes", report.total_length);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SplitDownloader {
    url: String,
    client: Option<Client>,
    config: SplitDownloaderConfig,
    interrupt: CancellationToken,
    progress_state: ProgressState,
}

impl SplitDownloader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: None,
            config: SplitDownloaderConfig::default(),
            interrupt: CancellationToken::new(),
            progress_state: ProgressState::new(),
        }
    }

    /// 使用外部构建的 HTTP 客户端；不调用时在 `send()` 内构建默认客户端。
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// 整体替换配置。
    pub fn config(mut self, config: SplitDownloaderConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置分片数（即并发请求数），必须大于 0。
    pub fn division_count(mut self, division_count: usize) -> Self {
        self.config.division_count = division_count;
        self
    }

    /// 设置拉取阶段的整体超时。
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// 设置目标文件路径；不调用则保存为当前目录下的资源文件名。
    pub fn save_to(mut self, path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        self.config.save_path = if p.as_os_str().is_empty() {
            None
        } else {
            Some(p.to_path_buf())
        };
        self
    }

    /// 设置临时目录的父目录。
    pub fn scratch_in(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.scratch_parent = Some(dir.as_ref().to_path_buf());
        self
    }

    /// 接入外部中断信号；令牌被取消时，下载以 [`DownloadError::Interrupted`] 结束。
    pub fn with_interrupt(mut self, interrupt: CancellationToken) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// 当前使用的中断令牌，可交给其他任务用于取消下载。
    pub fn interrupt_handle(&self) -> CancellationToken {
        self.interrupt.clone()
    }

    /// 内置的下载进度状态；返回可共享句柄，`.watch()` 后 `changed().await` 监听进度。
    pub fn progress(&self) -> ProgressState {
        self.progress_state.clone()
    }

    /// 执行下载。临时目录在返回前删除，无论成败。
    pub async fn send(self) -> Result<DownloadReport, DownloadError> {
        if self.url.trim().is_empty() {
            return Err(DownloadError::MissingArgument);
        }
        self.config.validate()?;

        let url = Url::parse(self.url.trim())?;
        let client = match self.client {
            Some(c) => c,
            None => build_client(self.config.timeout)?,
        };

        // 探测同样受整体超时约束
        let resource = tokio::select! {
            biased;
            _ = self.interrupt.cancelled() => return Err(DownloadError::Interrupted),
            resource = tokio::time::timeout(self.config.timeout, probe(&client, &url)) => {
                resource.map_err(|_| DownloadError::Timeout(self.config.timeout))??
            }
        };

        let destination = self
            .config
            .save_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&resource.file_name));

        let scratch = ScratchDir::create(self.config.scratch_parent.as_deref())?;
        let plan = DownloadPlan::build(
            resource.total_length,
            self.config.division_count,
            scratch.path(),
            &resource.file_name,
        );
        let job = DownloadJob::new(resource, plan, self.config.timeout, destination);

        let result = job
            .run(RunJobParams {
                client: &client,
                interrupt: &self.interrupt,
                progress: &self.progress_state,
            })
            .await;

        if let Err(e) = scratch.close() {
            warn!(error = %e, "临时目录清理失败");
        }

        if let Ok(report) = &result {
            info!(
                destination = %report.destination.display(),
                bytes = report.total_length,
                elapsed = ?report.elapsed,
                "下载完成"
            );
        }
        result
    }
}

/// 以默认配置下载到当前目录。
pub async fn download(url: &str) -> Result<DownloadReport, DownloadError> {
    SplitDownloader::new(url).send().await
}

/// 默认客户端，连接超时取配置的超时。
fn build_client(connect_timeout: Duration) -> Result<Client, DownloadError> {
    let client = Client::builder()
        .user_agent(concat!("split-dl/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(connect_timeout)
        .build()?;
    Ok(client)
}
