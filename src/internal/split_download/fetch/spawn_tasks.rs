//! 分片拉取：为计划中的每个分片 spawn 一个任务。

use reqwest::Client;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::internal::split_download::structs::{DownloadError, DownloadPlan};
use crate::internal::states::progress_state::ProgressState;

use super::fetch_one_segment::{FetchSegmentParams, fetch_one_segment};

/// 生成并 spawn 分片任务时的参数。
pub struct SpawnSegmentTasksParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub plan: &'a DownloadPlan,
    pub cancel: &'a CancellationToken,
    pub progress: &'a ProgressState,
}

/// 每个分片一个任务，并发数等于分片数；各任务只拿到自己的分片副本和取消令牌的子令牌。
pub fn spawn_segment_tasks(
    params: SpawnSegmentTasksParams<'_>,
) -> JoinSet<Result<(), DownloadError>> {
    let mut tasks = JoinSet::new();
    for segment in params.plan.segments() {
        tasks.spawn(fetch_one_segment(FetchSegmentParams {
            client: params.client.clone(),
            url: params.url.clone(),
            segment: segment.clone(),
            cancel: params.cancel.child_token(),
            progress: params.progress.clone(),
        }));
    }
    tasks
}
