use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::internal::remote_resource::structs::RemoteResource;
use crate::internal::split_download::fetch::{FetchPhaseParams, run_fetch_phase};
use crate::internal::split_download::merge::{MergeParams, merge_segments};
use crate::internal::states::progress_state::ProgressState;

use super::download_error::DownloadError;
use super::download_plan::DownloadPlan;
use super::download_report::DownloadReport;

/// 一次下载任务：拉取阶段 + 合并阶段。截止时间在创建时确定。
#[derive(Debug)]
pub struct DownloadJob {
    resource: RemoteResource,
    plan: DownloadPlan,
    deadline: Instant,
    timeout: Duration,
    destination: PathBuf,
}

/// 执行任务所需的外部资源。
pub struct RunJobParams<'a> {
    pub client: &'a Client,
    pub interrupt: &'a CancellationToken,
    pub progress: &'a ProgressState,
}

impl DownloadJob {
    pub fn new(
        resource: RemoteResource,
        plan: DownloadPlan,
        timeout: Duration,
        destination: PathBuf,
    ) -> Self {
        let now = Instant::now();
        // 超大超时按“永不超时”处理
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365));

        Self {
            resource,
            plan,
            deadline,
            timeout,
            destination,
        }
    }

    /// 拉取全部分片后合并；拉取阶段出错时不会进入合并，也不会产生目标文件。
    pub async fn run(self, params: RunJobParams<'_>) -> Result<DownloadReport, DownloadError> {
        let started = std::time::Instant::now();
        params.progress.start(self.plan.total_length());

        info!(
            segments = self.plan.len(),
            total_length = self.plan.total_length(),
            timeout = ?self.timeout,
            "开始分片拉取"
        );

        run_fetch_phase(FetchPhaseParams {
            client: params.client,
            url: &self.resource.url,
            plan: &self.plan,
            deadline: self.deadline,
            timeout: self.timeout,
            interrupt: params.interrupt,
            progress: params.progress,
        })
        .await?;

        let written = merge_segments(MergeParams {
            plan: &self.plan,
            destination: &self.destination,
            interrupt: params.interrupt,
        })
        .await?;

        Ok(DownloadReport {
            destination: self.destination,
            total_length: written,
            segment_count: self.plan.len(),
            elapsed: started.elapsed(),
        })
    }
}
