pub mod download_error;
pub mod download_job;
pub mod download_plan;
pub mod download_progress;
pub mod download_report;
pub mod segment;
pub mod split_downloader_config;

// 重导出公共类型
pub use download_error::{DownloadError, DownloadErrorKind};
pub use download_job::{DownloadJob, RunJobParams};
pub use download_plan::{ByteRange, DownloadPlan, plan_ranges};
pub use download_progress::DownloadProgress;
pub use download_report::DownloadReport;
pub use segment::Segment;
pub use split_downloader_config::{
    DEFAULT_DIVISION_COUNT, DEFAULT_TIMEOUT_SECS, SCRATCH_DIR_PREFIX, SplitDownloaderConfig,
};
