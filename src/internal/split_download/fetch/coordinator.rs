//! 分片拉取编排：并发拉取全部分片，共享截止时间，首个失败即取消其余任务。
//!
//! 外部中断、截止时间到达、任一任务出错，三者走同一条取消路径：
//! 记录第一个错误、取消全部任务、等所有任务退出后再返回该错误。

use std::time::Duration;

use reqwest::Client;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::internal::split_download::structs::{DownloadError, DownloadPlan};
use crate::internal::states::progress_state::ProgressState;

use super::spawn_tasks::{SpawnSegmentTasksParams, spawn_segment_tasks};

pub struct FetchPhaseParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub plan: &'a DownloadPlan,
    /// 拉取阶段的截止时间，任何任务启动前确定
    pub deadline: Instant,
    /// 仅用于超时错误信息
    pub timeout: Duration,
    pub interrupt: &'a CancellationToken,
    pub progress: &'a ProgressState,
}

/// 拉取全部分片。返回时不会有任何分片任务仍在运行。
pub async fn run_fetch_phase(params: FetchPhaseParams<'_>) -> Result<(), DownloadError> {
    let cancel = CancellationToken::new();
    let mut tasks = spawn_segment_tasks(SpawnSegmentTasksParams {
        client: params.client,
        url: params.url,
        plan: params.plan,
        cancel: &cancel,
        progress: params.progress,
    });

    let deadline = sleep_until(params.deadline);
    tokio::pin!(deadline);

    let mut first_error: Option<DownloadError> = None;

    loop {
        tokio::select! {
            biased;

            _ = params.interrupt.cancelled(), if first_error.is_none() => {
                warn!("收到中断信号，取消全部分片");
                first_error = Some(DownloadError::Interrupted);
                cancel.cancel();
            }

            _ = &mut deadline, if first_error.is_none() => {
                warn!(timeout = ?params.timeout, "拉取超时，取消全部分片");
                first_error = Some(DownloadError::Timeout(params.timeout));
                cancel.cancel();
            }

            joined = tasks.join_next() => {
                let Some(joined) = joined else { break };
                let outcome = joined.map_err(DownloadError::from).and_then(|r| r);
                if let Err(e) = outcome {
                    if first_error.is_none() {
                        warn!(error = %e, "分片失败，取消其余分片");
                        first_error = Some(e);
                        cancel.cancel();
                    } else {
                        debug!(error = %e, "已取消，丢弃后续错误");
                    }
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
