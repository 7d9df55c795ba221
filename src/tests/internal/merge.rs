//! 合并测试：按序拼接、缺失分片、长度不符、中断；失败时目标路径不留文件。

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::DownloadErrorKind;
use crate::split_download::merge::{MergeParams, merge_segments, staging_path};
use crate::split_download::structs::{DownloadError, DownloadPlan};
use crate::tests::fixture_bytes;

/// 按计划把 `body` 切好写进各分片文件。
fn write_segments(plan: &DownloadPlan, body: &[u8]) {
    for s in plan.segments() {
        std::fs::write(&s.storage_path, &body[s.start_byte as usize..=s.end_byte as usize])
            .unwrap();
    }
}

#[tokio::test]
async fn merges_segments_in_index_order() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let body = fixture_bytes(1_000_000);
    let plan = DownloadPlan::build(1_000_000, 5, scratch.path(), "big.bin");
    write_segments(&plan, &body);

    let dest = out.path().join("big.bin");
    let written = merge_segments(MergeParams {
        plan: &plan,
        destination: &dest,
        interrupt: &CancellationToken::new(),
    })
    .await
    .unwrap();

    assert_eq!(written, 1_000_000);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
    assert!(!staging_path(&dest).unwrap().exists());
}

#[tokio::test]
async fn missing_segment_leaves_no_destination() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let body = fixture_bytes(300);
    let plan = DownloadPlan::build(300, 3, scratch.path(), "m.bin");
    write_segments(&plan, &body);
    std::fs::remove_file(&plan.segments()[1].storage_path).unwrap();

    let dest = out.path().join("m.bin");
    let err = merge_segments(MergeParams {
        plan: &plan,
        destination: &dest,
        interrupt: &CancellationToken::new(),
    })
    .await
    .unwrap_err();

    assert!(matches!(err, DownloadError::ReadSegmentFile { index: 1, .. }));
    assert_eq!(err.kind(), DownloadErrorKind::IoError);
    assert!(!dest.exists());
    assert!(!staging_path(&dest).unwrap().exists());
}

#[tokio::test]
async fn length_mismatch_keeps_existing_destination() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let body = fixture_bytes(100);
    let plan = DownloadPlan::build(100, 2, scratch.path(), "l.bin");
    write_segments(&plan, &body);
    // 第二段少一个字节
    std::fs::write(&plan.segments()[1].storage_path, &body[50..99]).unwrap();

    let dest = out.path().join("l.bin");
    std::fs::write(&dest, b"previous").unwrap();

    let err = merge_segments(MergeParams {
        plan: &plan,
        destination: &dest,
        interrupt: &CancellationToken::new(),
    })
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        DownloadError::MergedLength {
            expected: 100,
            actual: 99
        }
    ));
    assert_eq!(std::fs::read(&dest).unwrap(), b"previous");
}

#[tokio::test]
async fn interrupted_merge_is_abandoned() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let plan = DownloadPlan::build(10, 2, scratch.path(), "i.bin");
    write_segments(&plan, &fixture_bytes(10));

    let interrupt = CancellationToken::new();
    interrupt.cancel();

    let dest = out.path().join("i.bin");
    let err = merge_segments(MergeParams {
        plan: &plan,
        destination: &dest,
        interrupt: &interrupt,
    })
    .await
    .unwrap_err();

    assert!(matches!(err, DownloadError::Interrupted));
    assert!(!dest.exists());
}

#[tokio::test]
async fn empty_plan_produces_empty_file() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let plan = DownloadPlan::build(0, 5, scratch.path(), "e.bin");

    let dest = out.path().join("e.bin");
    let written = merge_segments(MergeParams {
        plan: &plan,
        destination: &dest,
        interrupt: &CancellationToken::new(),
    })
    .await
    .unwrap();

    assert_eq!(written, 0);
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), 0);
}

#[test]
fn staging_file_sits_next_to_destination() {
    let p = staging_path(Path::new("/data/out/file.iso")).unwrap();
    assert_eq!(p, Path::new("/data/out/.file.iso.part"));
    assert!(staging_path(Path::new("/")).is_err());
}

/// 分片文件是一个迟迟不出数据的管道，合并卡在拷贝中途时也要响应中断。
#[cfg(unix)]
#[tokio::test]
async fn interrupt_during_segment_copy() {
    use std::sync::mpsc;
    use std::time::Duration;

    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let plan = DownloadPlan::build(10, 1, scratch.path(), "p.bin");
    let fifo = plan.segments()[0].storage_path.clone();
    let status = std::process::Command::new("mkfifo")
        .arg(&fifo)
        .status()
        .unwrap();
    assert!(status.success());

    // 写端保持打开但不写数据，直到测试结束才关闭
    let (release, hold) = mpsc::channel::<()>();
    let writer_path = fifo.clone();
    std::thread::spawn(move || {
        let writer = std::fs::OpenOptions::new()
            .write(true)
            .open(&writer_path)
            .unwrap();
        let _ = hold.recv();
        drop(writer);
    });

    let interrupt = CancellationToken::new();
    let trigger = interrupt.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let dest = out.path().join("p.bin");
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        merge_segments(MergeParams {
            plan: &plan,
            destination: &dest,
            interrupt: &interrupt,
        }),
    )
    .await;
    let _ = release.send(());

    let err = result.expect("合并应在中断后返回").unwrap_err();
    assert!(matches!(err, DownloadError::Interrupted));
    assert!(!dest.exists());
    assert!(!staging_path(&dest).unwrap().exists());
}
