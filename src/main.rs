//! `split-dl` 命令行：把一个支持 Range 的 URL 分片并发下载到本地文件。

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use split_dl::states::progress_state::ProgressState;
use split_dl::{
    DEFAULT_DIVISION_COUNT, DEFAULT_TIMEOUT_SECS, DownloadError, DownloadReport, SplitDownloader,
};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "split-dl", version, about = "Range 分片并发下载")]
struct Cli {
    /// 要下载的资源 URL
    url: Option<String>,

    /// 分片数（并发请求数）
    #[arg(short = 'n', long, default_value_t = DEFAULT_DIVISION_COUNT)]
    division: usize,

    /// 拉取阶段整体超时（秒）
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// 保存路径，默认为当前目录下的资源文件名
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// 分片临时目录的父目录，默认为系统临时目录
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// 不显示进度条
    #[arg(long)]
    no_progress: bool,

    /// 输出调试日志
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(report) => {
            println!(
                "已保存 {} ({} 字节, {} 个分片, 用时 {:.2?})",
                report.destination.display(),
                report.total_length,
                report.segment_count,
                report.elapsed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<DownloadReport, DownloadError> {
    let url = cli.url.ok_or(DownloadError::MissingArgument)?;

    let mut downloader = SplitDownloader::new(url)
        .division_count(cli.division)
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(output) = cli.output {
        downloader = downloader.save_to(output);
    }
    if let Some(dir) = cli.scratch_dir {
        downloader = downloader.scratch_in(dir);
    }

    let interrupt = downloader.interrupt_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到 Ctrl-C，正在取消下载");
            interrupt.cancel();
        }
    });

    let bar = (!cli.no_progress).then(|| spawn_progress_bar(downloader.progress()));

    let result = downloader.send().await;

    ctrl_c.abort();
    if let Some((pb, handle)) = bar {
        handle.abort();
        if result.is_ok() {
            pb.finish();
        } else {
            pb.abandon();
        }
    }
    result
}

/// 日志写到 stderr，`RUST_LOG` 优先于 `--debug`。
fn init_logging(debug: bool) {
    let default = if debug { "split_dl=debug" } else { "split_dl=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("日志初始化失败: {e}");
    }
}

fn spawn_progress_bar(state: ProgressState) -> (ProgressBar, JoinHandle<()>) {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("##-");
    pb.set_style(style);

    let bar = pb.clone();
    let mut watcher = state.watch();
    let handle = tokio::spawn(async move {
        while let Some(progress) = watcher.changed().await {
            if let Some(total) = progress.total {
                bar.set_length(total);
            }
            bar.set_position(progress.bytes_done);
        }
        debug!("进度监听结束");
    });

    (pb, handle)
}
