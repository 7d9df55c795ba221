//! # ProgressState
//!
//! 下载进度的响应式容器，基于 [`tokio::sync::watch`] 实现。
//!
//! 所有分片任务共享同一个计数器：写盘后累加字节数并推送新值，
//! 调用方通过 [`ProgressState::watch`] 异步监听，或用 [`ProgressState::current`] 读取快照。
//! 推送从不阻塞，也不要求存在监听者。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::internal::split_download::structs::DownloadProgress;

#[derive(Debug)]
struct Inner {
    bytes_done: AtomicU64,
    sender: watch::Sender<DownloadProgress>,
}

/// 可共享的进度句柄，clone 后指向同一份状态。
#[derive(Debug, Clone)]
pub struct ProgressState {
    inner: Arc<Inner>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressState {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DownloadProgress::default());
        Self {
            inner: Arc::new(Inner {
                bytes_done: AtomicU64::new(0),
                sender,
            }),
        }
    }

    /// 开始新一轮拉取：计数清零并写入总大小。
    pub fn start(&self, total: u64) {
        self.inner.bytes_done.store(0, Ordering::Relaxed);
        self.inner.sender.send_replace(DownloadProgress {
            bytes_done: 0,
            total: Some(total),
        });
    }

    /// 累加已写入的字节数，返回累加后的总量。
    pub fn advance(&self, len: u64) -> u64 {
        let current = self.inner.bytes_done.fetch_add(len, Ordering::Relaxed) + len;
        // 并发推送可能乱序，只允许进度前进
        self.inner.sender.send_modify(|p| {
            p.bytes_done = p.bytes_done.max(current);
        });
        current
    }

    pub fn current(&self) -> DownloadProgress {
        *self.inner.sender.borrow()
    }

    pub fn watch(&self) -> ProgressWatcher {
        ProgressWatcher {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

/// 进度监听器。
pub struct ProgressWatcher {
    receiver: watch::Receiver<DownloadProgress>,
}

impl ProgressWatcher {
    /// 等待下一次变化并返回新值；所有 [`ProgressState`] 句柄都销毁后返回 `None`。
    pub async fn changed(&mut self) -> Option<DownloadProgress> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }

    pub fn borrow(&self) -> DownloadProgress {
        *self.receiver.borrow()
    }
}
